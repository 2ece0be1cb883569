use std::collections::HashSet;

use crate::fixtures::{seed::SeededUser, test_app::TestApp};
use serde_json::{Value, json};

fn ids(listings: &[Value]) -> Vec<String> {
    listings
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect()
}

async fn seed_bedrooms(app: &TestApp, owner: &SeededUser) {
    for bedrooms in [1, 2, 3] {
        app.create_listing(
            owner,
            json!({ "name": format!("{bedrooms} bedroom flat"), "bedrooms": bedrooms }),
        )
        .await;
    }
}

#[tokio::test]
async fn bedrooms_is_a_lower_bound() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    seed_bedrooms(&app, &owner).await;

    let results = app.search("bedrooms=2").await;

    let mut bedrooms: Vec<u64> = results
        .iter()
        .map(|l| l["bedrooms"].as_u64().unwrap())
        .collect();
    bedrooms.sort();
    assert_eq!(bedrooms, vec![2, 3]);
}

#[tokio::test]
async fn missing_type_returns_rent_and_sell() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    app.create_listing(&owner, json!({ "name": "For rent", "type": "rent" }))
        .await;
    app.create_listing(&owner, json!({ "name": "For sale", "type": "sell" }))
        .await;

    let results = app.search("").await;
    let types: HashSet<&str> = results.iter().map(|l| l["type"].as_str().unwrap()).collect();
    assert_eq!(types, HashSet::from(["rent", "sell"]));

    let rentals = app.search("type=rent").await;
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0]["type"], "rent");
}

#[tokio::test]
async fn offer_true_keeps_only_offers() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    for i in 0..5 {
        let offer = i < 2;
        let mut overrides = json!({ "name": format!("Listing {i}"), "offer": offer });
        if offer {
            overrides["discountPrice"] = json!(200000.0);
        }
        app.create_listing(&owner, overrides).await;
    }

    let offers = app.search("offer=true").await;
    assert!(offers.len() <= 2);
    assert_eq!(offers.len(), 2);
    assert!(offers.iter().all(|l| l["offer"] == true));
}

#[tokio::test]
async fn amenity_flags_only_restrict_when_true() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    app.create_listing(&owner, json!({ "name": "Furnished", "furnished": true, "pets": true }))
        .await;
    app.create_listing(&owner, json!({ "name": "Bare", "furnished": false }))
        .await;

    let all = app.search("").await;
    assert_eq!(all.len(), 2);

    // "false" is not an inverse filter: it leaves the field unrestricted
    let not_true = app.search("furnished=false&pets=nope").await;
    assert_eq!(ids(&not_true).len(), 2);

    let furnished = app.search("furnished=true").await;
    assert_eq!(furnished.len(), 1);
    assert_eq!(furnished[0]["name"], "Furnished");

    let both = app.search("furnished=true&pets=true").await;
    assert_eq!(both.len(), 1);
    let none = app.search("furnished=true&garden=true").await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn category_ref_takes_precedence_over_category_name() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root").await;
    let condo = app.create_category(&admin, "Condo").await;

    app.create_listing(&admin, json!({ "name": "Tower unit", "category": "", "categoryRef": condo }))
        .await;
    app.create_listing(&admin, json!({ "name": "Family house", "category": "House" }))
        .await;

    let by_ref = app
        .search(&format!("categoryRef={condo}&category=House"))
        .await;
    assert_eq!(by_ref.len(), 1);
    assert_eq!(by_ref[0]["name"], "Tower unit");

    let by_name = app.search("category=House").await;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0]["name"], "Family house");

    // A malformed ref falls back to the name filter
    let fallback = app.search("categoryRef=not-an-id&category=House").await;
    assert_eq!(fallback.len(), 1);

    let any = app.search("category=all").await;
    assert_eq!(any.len(), 2);
}

#[tokio::test]
async fn city_ref_restricts_to_that_city() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("root").await;
    let gdl = app.create_city(&admin, "Guadalajara", "Jalisco").await;

    app.create_listing(&admin, json!({ "name": "Chapultepec loft", "cityRef": gdl }))
        .await;
    app.create_listing(&admin, json!({ "name": "Elsewhere" })).await;

    let results = app.search(&format!("cityRef={gdl}")).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["city"], "Guadalajara, Jalisco");
}

#[tokio::test]
async fn limit_caps_the_page_and_pages_do_not_overlap() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    for i in 0..5 {
        app.create_listing(&owner, json!({ "name": format!("Listing {i}") }))
            .await;
    }

    let first = app.search("limit=2&startIndex=0").await;
    let second = app.search("limit=2&startIndex=2").await;
    let third = app.search("limit=2&startIndex=4").await;
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);

    let first_ids: HashSet<String> = ids(&first).into_iter().collect();
    let second_ids: HashSet<String> = ids(&second).into_iter().collect();
    assert!(first_ids.is_disjoint(&second_ids));

    let default_page = app.search("").await;
    assert_eq!(default_page.len(), 5);
}

#[tokio::test]
async fn identical_requests_return_identical_order() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    for price in [100000.0, 100000.0, 100000.0, 90000.0] {
        app.create_listing(&owner, json!({ "regularPrice": price })).await;
    }

    let query = "sort=regularPrice&order=asc&limit=3";
    let a = ids(&app.search(query).await);
    let b = ids(&app.search(query).await);
    assert_eq!(a, b);
}

#[tokio::test]
async fn sort_by_price_in_both_directions() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    for price in [300000.0, 100000.0, 200000.0] {
        app.create_listing(&owner, json!({ "regularPrice": price })).await;
    }

    let prices = |listings: Vec<Value>| -> Vec<f64> {
        listings
            .iter()
            .map(|l| l["regularPrice"].as_f64().unwrap())
            .collect()
    };

    assert_eq!(
        prices(app.search("sort=regularPrice&order=asc").await),
        vec![100000.0, 200000.0, 300000.0]
    );
    assert_eq!(
        prices(app.search("sort=regularPrice&order=desc").await),
        vec![300000.0, 200000.0, 100000.0]
    );
}

#[tokio::test]
async fn malformed_parameters_behave_as_omitted() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    seed_bedrooms(&app, &owner).await;

    let results = app
        .search("bedrooms=abc&bathrooms=&limit=-4&startIndex=x&type=villa&currency=EUR&sort=passwordHash&order=sideways")
        .await;
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn search_term_is_case_insensitive_and_literal() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    app.create_listing(&owner, json!({ "name": "Casa del Lago", "address": "Calle 5" }))
        .await;
    app.create_listing(&owner, json!({ "name": "Depto (centro)", "address": "Juarez 12" }))
        .await;

    let lago = app.search("searchTerm=LAGO").await;
    assert_eq!(lago.len(), 1);
    assert_eq!(lago[0]["name"], "Casa del Lago");

    let by_address = app.search("searchTerm=juarez").await;
    assert_eq!(by_address.len(), 1);

    // Regex metacharacters are matched literally
    let literal = app.search("searchTerm=%28centro%29").await;
    assert_eq!(literal.len(), 1);
    let unbalanced = app.search("searchTerm=%28cen").await;
    assert_eq!(unbalanced.len(), 1);
}

#[tokio::test]
async fn currency_and_numeric_bounds_combine() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    app.create_listing(
        &owner,
        json!({ "name": "Peso house", "currency": "MXN", "constructionArea": 300.0, "bathrooms": 3.5 }),
    )
    .await;
    app.create_listing(
        &owner,
        json!({ "name": "Dollar house", "currency": "USD", "constructionArea": 300.0 }),
    )
    .await;
    app.create_listing(
        &owner,
        json!({ "name": "Small peso flat", "currency": "MXN", "constructionArea": 60.0 }),
    )
    .await;

    let results = app.search("currency=MXN&squareMeters=100").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Peso house");

    let baths = app.search("bathrooms=3").await;
    assert_eq!(baths.len(), 1);
    assert_eq!(baths[0]["name"], "Peso house");
}
