//! Integration tests for the catalog against a real Postgres.
//!
//! Everything here depends on database behavior: slug suffixing, the
//! case-insensitive tag uniqueness, the single-featured-project
//! transaction, supporter records, and the Postgres-backed search store.
//!
//! The database is shared across tests, so every test uses names unique
//! to itself.

mod common;

use crate::common::{create_tagged_app, create_test_account, create_test_project, TestHarness};
use catalog_core::domains::accounts::Account;
use catalog_core::domains::catalog::models::{App, Dataset, Link, Project, Supporter, Tag};
use catalog_core::domains::catalog::search::{category, find_resources};
use catalog_core::kernel::CatalogStore;
use test_context::test_context;

// =============================================================================
// Slugs and tags
// =============================================================================

/// Resources submitted under the same name get numbered slugs
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn app_slug_collisions_get_numeric_suffixes(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let first = App::create("Crime Map Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();
    let second = App::create("Crime Map Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();
    let third = App::create("Crime Map Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();

    assert_eq!(first.slug, "crime-map-pgt");
    assert_eq!(second.slug, "crime-map-pgt-2");
    assert_eq!(third.slug, "crime-map-pgt-3");
}

/// Tag names are unique in any casing; find_or_create reuses them
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn tag_names_are_unique_in_any_casing(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let tag = Tag::create("Transit Pgt", pool).await.unwrap();
    assert_eq!(tag.slug, "transit-pgt");

    let duplicate = Tag::create("transit pgt", pool).await;
    assert!(
        duplicate.is_err(),
        "direct creation surfaces the uniqueness violation"
    );

    let reused = Tag::find_or_create("TRANSIT PGT", pool).await.unwrap();
    assert_eq!(reused.id, tag.id);
    assert_eq!(reused.name, "Transit Pgt", "the first submitted casing sticks");
}

/// The same tag submitted twice in different casings attaches once
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn repeated_tag_names_attach_once(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let app = create_tagged_app(pool, "Bike Racks Pgt", &["wards-pgt", "Wards-Pgt"])
        .await
        .unwrap();

    let tags = Tag::find_for_app(app.id, pool).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "wards-pgt");
}

/// Editing replaces fields and the tag set; the slug never changes
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn editing_replaces_fields_and_tags(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let app = create_tagged_app(pool, "Tree Census Pgt", &["parks-pgt"])
        .await
        .unwrap();

    let updated = App::update(
        app.id,
        "Tree Census Pgt (2012)",
        "fresh numbers",
        "https://example.com/2012",
        pool,
    )
    .await
    .unwrap();
    assert_eq!(updated.slug, app.slug, "slugs are stable across edits");
    assert_eq!(updated.name, "Tree Census Pgt (2012)");

    let replacement = Tag::find_or_create("street-trees-pgt", pool).await.unwrap();
    App::set_tags(app.id, &[replacement.id], pool).await.unwrap();

    let tags = Tag::find_for_app(app.id, pool).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "street-trees-pgt");
}

// =============================================================================
// Projects
// =============================================================================

/// The featured flag moves atomically; there is never more than one
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn featuring_a_project_leaves_exactly_one_featured(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let first = create_test_project(pool, "Adopt a Hydrant Pgt", None)
        .await
        .unwrap();
    let second = create_test_project(pool, "Street Bump Pgt", None)
        .await
        .unwrap();

    Project::feature(first.id, pool).await.unwrap();
    let featured = Project::featured_project(pool).await.unwrap().unwrap();
    assert_eq!(featured.id, first.id);

    Project::feature(second.id, pool).await.unwrap();
    let featured = Project::featured_project(pool).await.unwrap().unwrap();
    assert_eq!(featured.id, second.id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE featured")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// A rejected video host aborts the save before anything persists
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn project_with_unsupported_video_never_persists(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let result = Project::create(
        "Dailymotion Pitch Pgt",
        "d",
        "Org",
        "https://www.dailymotion.com/video/x123",
        None,
        None,
        pool,
    )
    .await;
    assert!(result.is_err());

    let found = Project::find_by_slug("dailymotion-pitch-pgt", pool)
        .await
        .unwrap();
    assert!(found.is_none());
}

/// Members only see the projects they submitted themselves
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn find_by_submitter_lists_only_their_projects(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let alice = create_test_account(pool, "alice-pgt").await.unwrap();
    let bob = create_test_account(pool, "bob-pgt").await.unwrap();
    let hers = create_test_project(pool, "Wayfinding Pgt", Some(alice.id))
        .await
        .unwrap();
    create_test_project(pool, "Potholes Pgt", Some(bob.id))
        .await
        .unwrap();

    let submitted = Project::find_by_submitter(alice.id, pool).await.unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, hers.id);
}

// =============================================================================
// Supporters
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn supporters_attach_once_and_can_withdraw(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let account = create_test_account(pool, "supporter-pgt").await.unwrap();
    let project = create_test_project(pool, "Citizens Connect Pgt", None)
        .await
        .unwrap();

    let supporter = Supporter::add_project(account.id, project.id, pool)
        .await
        .unwrap();
    let again = Supporter::add_project(account.id, project.id, pool)
        .await
        .unwrap();
    assert_eq!(supporter.id, again.id, "one supporter record per account");

    let supporters = Supporter::find_for_project(project.id, pool).await.unwrap();
    assert_eq!(supporters.len(), 1);
    assert_eq!(supporters[0].username, "supporter-pgt");

    let supported = Supporter::projects(supporter.id, pool).await.unwrap();
    assert_eq!(supported.len(), 1);
    assert_eq!(supported[0].id, project.id);

    Supporter::remove_project(account.id, project.id, pool)
        .await
        .unwrap();
    let supporters = Supporter::find_for_project(project.id, pool).await.unwrap();
    assert!(supporters.is_empty());

    // The supporter record itself survives the withdrawal
    assert!(Supporter::find_by_account(account.id, pool)
        .await
        .unwrap()
        .is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn member_links_round_trip(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let account = create_test_account(pool, "linker-pgt").await.unwrap();
    let supporter = Supporter::find_or_create(account.id, pool).await.unwrap();

    Link::create(supporter.id, "https://example.com/blog", pool)
        .await
        .unwrap();
    Link::create(supporter.id, "https://example.com/code", pool)
        .await
        .unwrap();

    let links = Link::find_for_supporter(supporter.id, pool).await.unwrap();
    assert_eq!(links.len(), 2);
}

// =============================================================================
// The search engine against the Postgres store
// =============================================================================

/// An exact tag match returns tagged records; other types come back empty
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn tag_match_beats_substring_against_postgres(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let store = ctx.store();

    let app = create_tagged_app(pool, "Shelter Finder Pgt", &["gis-pgt"])
        .await
        .unwrap();
    // A dataset whose name carries the keyword but not the tag
    let dataset = Dataset::create("All about gis-pgt", "d", None, pool)
        .await
        .unwrap();
    assert!(dataset.url.is_none());

    let results = find_resources(&store, "GIS-PGT").await.unwrap();
    assert_eq!(results.apps.len(), 1);
    assert_eq!(results.apps[0].slug, app.slug);
    assert!(
        results.data.is_empty(),
        "a tag match must not fall back to substrings"
    );
    assert!(results.projects.is_empty());
}

/// With no such tag, the keyword falls back to a name substring match
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn keyword_without_tag_matches_name_substrings(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let store = ctx.store();

    App::create("Snowplow Tracker Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();
    Dataset::create(
        "Snowplow Routes Pgt",
        "d",
        Some("https://example.com/routes.csv"),
        pool,
    )
    .await
    .unwrap();

    let results = find_resources(&store, "snowplow").await.unwrap();
    assert_eq!(results.apps.len(), 1);
    assert_eq!(results.data.len(), 1);
    assert!(results.projects.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn category_sentinels_against_postgres(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let store = ctx.store();

    let app = create_tagged_app(pool, "Permit Viewer Pgt", &["permits-pgt"])
        .await
        .unwrap();

    // Unknown kind is the null sentinel, not an error
    let unknown = category(&store, "widgets", Some("permits-pgt")).await.unwrap();
    assert!(unknown.results.is_none());

    // A tag nobody has used yet is an empty listing
    let missing = category(&store, "apps", Some("no-such-tag-pgt")).await.unwrap();
    assert_eq!(missing.results, Some(Vec::new()));

    // The tag filter is case-sensitive, unlike the search bar
    let wrong_case = category(&store, "apps", Some("PERMITS-PGT")).await.unwrap();
    assert_eq!(wrong_case.results, Some(Vec::new()));

    let tagged = category(&store, "apps", Some("permits-pgt")).await.unwrap();
    let results = tagged.results.unwrap();
    assert!(results.iter().any(|r| r.slug == app.slug));

    // No tag at all lists everything of the kind
    let all = category(&store, "apps", None).await.unwrap();
    assert!(all.results.unwrap().iter().any(|r| r.slug == app.slug));
}

/// Listings come back in submission order
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn listings_keep_submission_order(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let older = App::create("Ordering First Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();
    let newer = App::create("Ordering Second Pgt", "d", "https://example.com", pool)
        .await
        .unwrap();

    let all = App::find_all(pool).await.unwrap();
    let older_pos = all.iter().position(|a| a.id == older.id).unwrap();
    let newer_pos = all.iter().position(|a| a.id == newer.id).unwrap();
    assert!(older_pos < newer_pos);
}

/// Autocomplete matches tag-name fragments in any casing
#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn autocomplete_matches_tag_fragments(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let store = ctx.store();

    Tag::find_or_create("education-pgt", pool).await.unwrap();

    let tags = store.find_tags_matching("EDUCATION-PG").await.unwrap();
    assert!(tags.iter().any(|t| t.name == "education-pgt"));
}

// =============================================================================
// Accounts
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn register_round_trip_and_duplicate_username(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let account = Account::register("mayor-pgt", "mayor-pgt@example.com", "hunter2hunter2", pool)
        .await
        .unwrap();

    let found = Account::find_by_username("mayor-pgt", pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, account.id);
    assert!(found.verify_password("hunter2hunter2"));
    assert!(!found.verify_password("wrong"));

    let duplicate =
        Account::register("mayor-pgt", "other@example.com", "hunter2hunter2", pool).await;
    assert!(duplicate.is_err(), "usernames are unique");
}
