//! End-to-end browse session scenarios against the in-memory backend.

use parts_quote::{
    catalog::SortField, Advance, BrowseSession, CatalogBackend, CategoryNode, CategoryPath,
    OfferCell, PriceResponse, PricingContext, Product, ProductId, SessionEvent, SessionOptions,
    StaticBackend,
};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// Fixtures
// ============================================================================

fn tree() -> CategoryNode {
    CategoryNode::root(vec![
        CategoryNode::branch(
            "Phones",
            vec![CategoryNode::leaf("iPhone"), CategoryNode::leaf("Samsung")],
        ),
        CategoryNode::leaf("Tools"),
    ])
}

fn priced(price: f64, provider: &str) -> PriceResponse {
    PriceResponse {
        customer_price: Some(price),
        dealer_price: Some(price * 0.8),
        provider: Some(provider.to_string()),
        ..PriceResponse::default()
    }
}

fn shop() -> StaticBackend {
    StaticBackend::new()
        .with_tree(tree())
        .with_product(
            CategoryPath::from_segments(["Phones", "iPhone"]),
            Product::new(1, "iPhone 12 Display"),
        )
        .with_product(
            CategoryPath::from_segments(["Phones", "iPhone"]),
            Product::new(2, "iPhone 12 Akku"),
        )
        .with_product(
            CategoryPath::from_segments(["Phones", "Samsung"]),
            Product::new(3, "Galaxy S21 Display"),
        )
        .with_product(
            CategoryPath::from_segments(["Tools"]),
            Product::new("T-9", "Heat gun"),
        )
        .with_price(1, priced(89.9, "foneday"))
        .with_price(2, priced(39.0, "b-parts"))
        .with_tier_price(1, "dealer", priced(71.0, "foneday"))
}

fn open(backend: &Arc<StaticBackend>, options: SessionOptions) -> BrowseSession {
    let mut session = BrowseSession::new(
        Arc::clone(backend) as Arc<dyn CatalogBackend>,
        PricingContext::public(),
        options,
    );
    session.load_categories();
    session.refresh_products();
    session.wait_catalog(WAIT);
    session
}

fn price_of(session: &BrowseSession, id: i64) -> Option<f64> {
    session
        .offer(&ProductId::Number(id))
        .and_then(|offer| offer.quote())
        .map(|quote| quote.customer_price)
}

// ============================================================================
// Category drill-down
// ============================================================================

#[test]
fn drill_down_commits_leaf_and_queries_backend() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());
    assert_eq!(session.menu_options().len(), 2);

    let first = session.choose_category("Phones");
    assert_eq!(
        first,
        Advance::InProgress(CategoryPath::from_segments(["Phones"]))
    );
    assert!(session.view().category.is_root(), "in-progress path is not a filter");

    let second = session.choose_category("iPhone");
    assert_eq!(
        second,
        Advance::Committed(CategoryPath::from_segments(["Phones", "iPhone"]))
    );
    assert!(session.menu_path().is_root(), "menu resets after commit");
    session.wait_catalog(WAIT);

    let last_query = backend.queries().pop().unwrap();
    assert_eq!(last_query.to_query_string(), "category1=Phones&category2=iPhone");

    let names: Vec<String> = session
        .current_page()
        .items
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(names, vec!["iPhone 12 Akku", "iPhone 12 Display"]);
}

#[test]
fn unknown_category_changes_nothing() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());
    let queries_before = backend.queries().len();

    assert_eq!(session.choose_category("Tablets"), Advance::NotFound);
    assert!(session.menu_path().is_root());
    assert!(session.is_idle());
    assert_eq!(backend.queries().len(), queries_before);
}

#[test]
fn dropdown_levels_follow_open_path() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());
    assert_eq!(session.dropdown_levels().len(), 1);

    let _ = session.select_category_level(0, "Phones");
    let levels = session.dropdown_levels();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[1][1].name, "Samsung");

    let committed = session.select_category_level(1, "Samsung");
    assert!(committed.is_committed());
    session.wait_catalog(WAIT);
    assert_eq!(session.store().products().len(), 1);

    session.clear_category();
    session.wait_catalog(WAIT);
    assert_eq!(session.store().products().len(), 4);
}

#[test]
fn dropdown_level_can_be_repicked_after_commit() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    let _ = session.select_category_level(0, "Phones");
    let committed = session.select_category_level(1, "iPhone");
    assert_eq!(
        committed,
        Advance::Committed(CategoryPath::from_segments(["Phones", "iPhone"]))
    );
    session.wait_catalog(WAIT);
    assert_eq!(session.dropdown_levels().len(), 2);
    assert_eq!(
        session.dropdown_path(),
        &CategoryPath::from_segments(["Phones", "iPhone"])
    );

    let repicked = session.select_category_level(1, "Samsung");
    assert_eq!(
        repicked,
        Advance::Committed(CategoryPath::from_segments(["Phones", "Samsung"]))
    );
    session.wait_catalog(WAIT);
    assert_eq!(
        session.view().category,
        CategoryPath::from_segments(["Phones", "Samsung"])
    );
    assert_eq!(session.store().products().len(), 1);
    assert!(session.menu_path().is_root());
}

#[test]
fn direct_category_shows_in_dropdowns() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    session.set_category(CategoryPath::from_segments(["Phones", "iPhone"]));
    assert_eq!(session.dropdown_levels().len(), 2);

    let repicked = session.select_category_level(0, "Tools");
    assert!(repicked.is_committed());
    assert_eq!(session.view().category, CategoryPath::from_segments(["Tools"]));
}

// ============================================================================
// Filter, sort, paginate
// ============================================================================

#[test]
fn twenty_three_products_make_three_pages() {
    let backend = (1..=23).fold(StaticBackend::new(), |b, i| {
        b.with_product(CategoryPath::root(), Product::new(i, format!("part {i:02}")))
    });
    let backend = Arc::new(backend);
    let mut session = open(&backend, SessionOptions::default());

    assert_eq!(session.total_pages(), 3);
    session.goto_page(4);
    assert_eq!(session.view().page, 3);
    let page = session.current_page();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].name, "part 21");

    session.next_page();
    assert_eq!(session.view().page, 3);
    session.prev_page();
    assert_eq!(session.view().page, 2);
}

#[test]
fn filters_reset_page_but_sort_does_not() {
    let backend = (1..=30).fold(StaticBackend::new(), |b, i| {
        b.with_product(CategoryPath::root(), Product::new(i, format!("part {i:02}")))
    });
    let backend = Arc::new(backend);
    let mut session = open(&backend, SessionOptions::default());

    session.goto_page(3);
    session.sort_by(SortField::Id);
    assert_eq!(session.view().page, 3);

    session.set_id_filter("1");
    assert_eq!(session.view().page, 1);
    // 1, 10..19, 21 = 12 ids containing "1"
    assert_eq!(session.current_page().total_items, 12);
}

#[test]
fn search_term_goes_to_backend_and_replaces_list() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    session.set_search_term("display");
    session.wait_catalog(WAIT);
    assert_eq!(session.store().products().len(), 2);
    assert_eq!(
        backend.queries().pop().unwrap().to_query_string(),
        "name=display"
    );

    session.set_search_term("  display ");
    assert!(!session.is_loading(), "same effective term does not refetch");
}

#[test]
fn older_product_list_is_dropped_when_superseded() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    backend.hold_catalog();
    session.set_search_term("akku");
    session.set_search_term("display");
    backend.release_catalog();
    let events = session.wait_catalog(WAIT);

    assert!(events.contains(&SessionEvent::ProductsSuperseded));
    assert!(events.contains(&SessionEvent::ProductsLoaded { count: 2 }));
    let names: Vec<&str> = session
        .store()
        .products()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert!(names.iter().all(|name| name.contains("Display")));
    assert_eq!(names.len(), 2);
}

// ============================================================================
// Offers
// ============================================================================

#[test]
fn out_of_stock_is_an_offer_not_an_error() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    session.request_offer(ProductId::Number(42));
    let events = session.wait_idle(WAIT);
    assert_eq!(events, vec![SessionEvent::OfferStored(ProductId::Number(42))]);

    let offer = session.offer(&ProductId::Number(42)).unwrap();
    assert!(offer.is_out_of_stock());
    assert!(matches!(
        session.offer_cell(&ProductId::Number(42)),
        OfferCell::OutOfStock(_)
    ));
    assert!(session.banner().is_none());
}

#[test]
fn failed_price_sets_banner_and_leaves_cache() {
    let backend = Arc::new(shop().with_failing_price(3));
    let mut session = open(&backend, SessionOptions::default());

    session.request_offer(ProductId::Number(1));
    session.request_offer(ProductId::Number(3));
    session.wait_idle(WAIT);

    assert_eq!(price_of(&session, 1), Some(89.9));
    assert!(session.offer(&ProductId::Number(3)).is_none());
    assert_eq!(session.offer_cell(&ProductId::Number(3)), OfferCell::NotFetched);
    let banner = session.banner().unwrap();
    assert!(banner.text.contains("product 3"));
}

#[test]
fn later_request_replaces_earlier_offer() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    session.request_offer(ProductId::Number(1));
    session.wait_idle(WAIT);
    session.request_offer(ProductId::Number(1));
    assert!(matches!(
        session.offer_cell(&ProductId::Number(1)),
        OfferCell::Pending(Some(_))
    ));
    session.wait_idle(WAIT);
    assert_eq!(session.fetch_stats().offers_stored, 2);
    assert_eq!(session.offers().len(), 1);
}

#[test]
fn pricing_context_change_clears_cache_immediately() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    session.request_offer(ProductId::Number(1));
    session.request_offer(ProductId::Number(2));
    session.wait_idle(WAIT);
    assert_eq!(session.offers().len(), 2);

    session.set_pricing_context(PricingContext::new(Some("dealer".into()), None));
    assert!(session.offers().is_empty());

    session.request_offer(ProductId::Number(1));
    session.wait_idle(WAIT);
    assert_eq!(price_of(&session, 1), Some(71.0));

    let (_, context) = backend.price_requests().pop().unwrap();
    assert_eq!(context.user_type.as_deref(), Some("dealer"));
}

#[test]
fn stale_completion_from_old_context_is_discarded() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());

    backend.hold_prices();
    session.request_offer(ProductId::Number(1));
    session.set_pricing_context(PricingContext::new(Some("dealer".into()), None));
    session.request_offer(ProductId::Number(1));
    backend.release_prices();

    let events = session.wait_idle(WAIT);
    assert!(events.contains(&SessionEvent::OfferDiscarded(ProductId::Number(1))));
    assert!(events.contains(&SessionEvent::OfferStored(ProductId::Number(1))));
    assert_eq!(price_of(&session, 1), Some(71.0));
    assert_eq!(session.fetch_stats().stale_discarded, 1);
}

// ============================================================================
// Catalog failures
// ============================================================================

#[test]
fn catalog_failure_keeps_existing_data() {
    let backend = Arc::new(shop());
    let mut session = open(&backend, SessionOptions::default());
    assert_eq!(session.store().products().len(), 4);

    backend.set_catalog_down(true);
    session.set_search_term("akku");
    let events = session.wait_catalog(WAIT);

    assert!(events.contains(&SessionEvent::CatalogFailed));
    assert_eq!(session.store().products().len(), 4);
    assert!(session.banner().unwrap().text.starts_with("Catalog request failed"));
}

#[test]
fn banner_auto_clears_when_configured() {
    let backend = Arc::new(shop());
    backend.set_catalog_down(true);
    let mut session = open(
        &backend,
        SessionOptions {
            banner_auto_clear: Some(Duration::from_millis(200)),
            ..SessionOptions::default()
        },
    );
    assert!(session.banner().is_some());
    std::thread::sleep(Duration::from_millis(300));
    assert!(session.banner().is_none());
}
