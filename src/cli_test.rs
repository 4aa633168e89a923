use super::*;
use crate::cart::CartItem;
use crate::cart::session::CART_STORAGE_KEY;
use std::time::Duration;

fn ctx(dir: &tempfile::TempDir) -> ClientContext {
    ClientContext {
        // Nothing listens here; see `serve_catalog` for commands that fetch products.
        base_url: "http://127.0.0.1:9".into(),
        store_dir: dir.path().to_path_buf(),
        cart: CartConfig { debounce: Duration::from_millis(100), quota_bytes: 64 * 1024 },
    }
}

fn cart(command: CartSubcommand) -> ClientCommand {
    ClientCommand::Cart(CartCommand { command })
}

fn add_action(id: &str, price: f64) -> String {
    serde_json::json!({
        "type": "ADD_ITEM",
        "payload": {"productId": id, "name": id, "price": price, "image": format!("/images/{id}.png")}
    })
    .to_string()
}

/// Serve the bundled catalog on an ephemeral port and return its base URL.
async fn serve_catalog() -> String {
    let products_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/products.json");
    let app = crate::routes::app(crate::state::AppState::new(crate::config::ServerConfig { port: 0, products_path }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn stored(dir: &tempfile::TempDir) -> Vec<CartItem> {
    let raw = std::fs::read_to_string(dir.path().join(format!("{CART_STORAGE_KEY}.json"))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn parses_serve() {
    let cli = Cli::try_parse_from(["octodeco", "serve"]).unwrap();
    assert!(matches!(cli.command, Command::Serve));
    assert_eq!(cli.base_url, DEFAULT_BASE_URL);
}

#[test]
fn parses_cart_set_with_global_flags() {
    let cli = Cli::try_parse_from(["octodeco", "cart", "set", "professortocat", "3", "--store-dir", "/tmp/cart"]).unwrap();
    assert_eq!(cli.store_dir, PathBuf::from("/tmp/cart"));
    match cli.command {
        Command::Client(ClientCommand::Cart(CartCommand {
            command: CartSubcommand::Set { product_id, quantity },
        })) => {
            assert_eq!(product_id, "professortocat");
            assert!((quantity - 3.0).abs() < f64::EPSILON);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_negative_quantity() {
    let cli = Cli::try_parse_from(["octodeco", "cart", "set", "x", "-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Client(ClientCommand::Cart(CartCommand { command: CartSubcommand::Set { .. } }))
    ));
}

#[test]
fn dispatch_requires_an_action() {
    assert!(Cli::try_parse_from(["octodeco", "cart", "dispatch"]).is_err());
}

#[test]
fn checkout_requires_every_field() {
    assert!(Cli::try_parse_from(["octodeco", "checkout", "--email", "a@b.c"]).is_err());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn format_price_uses_two_decimals() {
    assert_eq!(format_price(4.99), "$4.99");
    assert_eq!(format_price(0.0), "$0.00");
    assert_eq!(format_price(13.970_000_000_000_002), "$13.97");
}

#[test]
fn render_empty_cart() {
    let out = render_cart(&CartState::new());
    assert!(out.starts_with("Cart (0 items)"));
    assert!(out.contains("Your cart is empty"));
    assert!(out.contains("Subtotal: $0.00"));
}

#[test]
fn render_cart_pluralizes_by_unit_count() {
    let item = CartItem {
        product_id: "a".into(),
        name: "Professortocat".into(),
        price: 4.99,
        image: "/a.png".into(),
        quantity: 1,
    };
    let one = CartState { items: vec![item.clone()], is_open: true };
    assert!(render_cart(&one).starts_with("Cart (1 item)"));
    assert!(render_cart(&one).contains("Panel: open"));

    let two = CartState { items: vec![CartItem { quantity: 2, ..item }], is_open: false };
    let out = render_cart(&two);
    assert!(out.starts_with("Cart (2 items)"));
    assert!(out.contains("$9.98"));
}

#[test]
fn render_products_handles_empty_catalog() {
    assert_eq!(render_products(&[]), "No products available\n");
}

// =============================================================================
// Cart commands against a local store
// =============================================================================

#[tokio::test]
async fn dispatch_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(&dir);

    let actions = vec![add_action("professortocat", 4.99), add_action("professortocat", 4.99)];
    let out = run(&ctx, cart(CartSubcommand::Dispatch { actions })).await.unwrap();
    assert!(out.starts_with("Cart (2 items)"));
    assert_eq!(stored(&dir)[0].quantity, 2);

    let out = run(&ctx, cart(CartSubcommand::Show)).await.unwrap();
    assert!(out.starts_with("Cart (2 items)"));
}

#[tokio::test]
async fn set_remove_and_clear_update_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(&dir);
    let actions = vec![add_action("a", 1.0), add_action("b", 2.0)];
    run(&ctx, cart(CartSubcommand::Dispatch { actions })).await.unwrap();

    run(&ctx, cart(CartSubcommand::Set { product_id: "a".into(), quantity: 5.0 })).await.unwrap();
    assert_eq!(stored(&dir)[0].quantity, 5);

    run(&ctx, cart(CartSubcommand::Set { product_id: "a".into(), quantity: 5.5 })).await.unwrap();
    assert_eq!(stored(&dir)[0].quantity, 5);

    run(&ctx, cart(CartSubcommand::Remove { product_id: "a".into() })).await.unwrap();
    assert_eq!(stored(&dir).len(), 1);

    run(&ctx, cart(CartSubcommand::Clear)).await.unwrap();
    assert!(stored(&dir).is_empty());
}

#[tokio::test]
async fn bad_action_json_applies_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(&dir);
    let actions = vec![add_action("a", 1.0), "not json".to_owned()];

    let err = run(&ctx, cart(CartSubcommand::Dispatch { actions })).await.unwrap_err();
    assert!(matches!(err, CliError::InvalidAction(_)));
    let out = run(&ctx, cart(CartSubcommand::Show)).await.unwrap();
    assert!(out.starts_with("Cart (0 items)"));
}

#[tokio::test]
async fn checkout_clears_the_stored_cart() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(&dir);
    run(&ctx, cart(CartSubcommand::Dispatch { actions: vec![add_action("a", 4.99)] }))
        .await
        .unwrap();

    let args = CheckoutArgs {
        email: "mona@example.com".into(),
        name: "Mona".into(),
        address: "1 Octo Way".into(),
        city: "San Francisco".into(),
        postal: "94107".into(),
        country: "US".into(),
        card: "4242".into(),
        expiry: "12/30".into(),
        cvv: "123".into(),
    };
    let out = run(&ctx, ClientCommand::Checkout(args)).await.unwrap();
    assert!(out.contains("Thank you for your order!"));
    assert!(out.contains("Your order number is: #"));
    assert!(stored(&dir).is_empty());
}

#[tokio::test]
async fn checkout_with_empty_cart_fails() {
    let dir = tempfile::tempdir().unwrap();
    let args = CheckoutArgs {
        email: "mona@example.com".into(),
        name: "Mona".into(),
        address: "1 Octo Way".into(),
        city: "SF".into(),
        postal: "94107".into(),
        country: "US".into(),
        card: "4242".into(),
        expiry: "12/30".into(),
        cvv: "123".into(),
    };
    let err = run(&ctx(&dir), ClientCommand::Checkout(args)).await.unwrap_err();
    assert!(matches!(err, CliError::Checkout(CheckoutError::EmptyCart)));
}

#[tokio::test]
async fn store_quota_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    ctx.cart.quota_bytes = 16;

    let err = run(&ctx, cart(CartSubcommand::Dispatch { actions: vec![add_action("a", 1.0)] }))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Store(StoreError::QuotaExceeded { .. })));
}

// =============================================================================
// Commands against a live catalog
// =============================================================================

#[tokio::test]
async fn products_lists_the_served_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    ctx.base_url = serve_catalog().await;

    let out = run(&ctx, ClientCommand::Products).await.unwrap();
    assert_eq!(out.lines().count(), 6);
    assert!(out.contains("professortocat"));
    assert!(out.contains("$4.99"));
}

#[tokio::test]
async fn add_fetches_product_and_increments_existing_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    ctx.base_url = serve_catalog().await;

    let add = || cart(CartSubcommand::Add { product_id: "professortocat".into() });
    let out = run(&ctx, add()).await.unwrap();
    assert!(out.starts_with("Added Professortocat to cart!"));

    let out = run(&ctx, add()).await.unwrap();
    assert!(out.contains("2 x   $4.99 =    $9.98"));
    let items = stored(&dir);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].name, "Professortocat");
}

#[tokio::test]
async fn add_unknown_product_fails_and_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = ctx(&dir);
    ctx.base_url = serve_catalog().await;

    let err = run(&ctx, cart(CartSubcommand::Add { product_id: "nope".into() })).await.unwrap_err();
    assert!(matches!(err, CliError::UnknownProduct(ref id) if id == "nope"));
    assert!(!dir.path().join(format!("{CART_STORAGE_KEY}.json")).exists());
}
