use reader_core::db::open_db_in_memory;
use reader_core::{
    ArticleCriteria, ArticleId, ArticleRepository, NewArticle, SqliteArticleRepository,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

#[test]
fn empty_criteria_matches_all_live_articles() {
    let conn = open_db_with_feeds(&["feed-1", "feed-2"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let kept_a = repo.create(&sample_article("feed-1", "a")).unwrap();
    let deleted = repo.create(&sample_article("feed-1", "b")).unwrap();
    let kept_b = repo.create(&sample_article("feed-2", "c")).unwrap();
    repo.delete(deleted).unwrap();

    let ids = summary_ids(&repo, &ArticleCriteria::new());
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&kept_a));
    assert!(ids.contains(&kept_b));
}

#[test]
fn deleted_articles_never_match_any_criteria_combination() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let mut article = sample_article("feed-1", "guid-x");
    article.publication_date = Some(5_000);
    let deleted = repo.create(&article).unwrap();
    repo.delete(deleted).unwrap();

    for mask in 0u8..64 {
        let mut criteria = ArticleCriteria::new();
        if mask & 1 != 0 {
            criteria = criteria.with_id(deleted);
        }
        if mask & 2 != 0 {
            criteria = criteria.with_guid_in(["guid-x"]);
        }
        if mask & 4 != 0 {
            criteria = criteria.with_title(article.title.clone());
        }
        if mask & 8 != 0 {
            criteria = criteria.with_url(article.url.clone());
        }
        if mask & 16 != 0 {
            criteria = criteria.with_publication_date_min(0);
        }
        if mask & 32 != 0 {
            criteria = criteria.with_feed_id("feed-1");
        }

        assert!(
            repo.find_by_criteria(&criteria).unwrap().is_empty(),
            "deleted article matched criteria {criteria:?}"
        );
        assert!(repo.find_first_by_criteria(&criteria).unwrap().is_none());
    }
}

#[test]
fn exact_filters_are_conjunctive() {
    let conn = open_db_with_feeds(&["feed-1", "feed-2"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let target = repo.create(&sample_article("feed-1", "shared")).unwrap();
    let other_feed = repo.create(&sample_article("feed-2", "shared")).unwrap();

    let by_guid = summary_ids(&repo, &ArticleCriteria::new().with_guid_in(["shared"]));
    assert_eq!(by_guid, vec![target, other_feed]);

    let by_guid_and_feed = summary_ids(
        &repo,
        &ArticleCriteria::new()
            .with_guid_in(["shared"])
            .with_feed_id("feed-1"),
    );
    assert_eq!(by_guid_and_feed, vec![target]);

    let by_title = summary_ids(&repo, &ArticleCriteria::new().with_title("Title shared"));
    assert_eq!(by_title.len(), 2);

    let by_url_and_wrong_id = summary_ids(
        &repo,
        &ArticleCriteria::new()
            .with_url("https://example.com/shared")
            .with_id(Uuid::new_v4()),
    );
    assert!(by_url_and_wrong_id.is_empty());
}

#[test]
fn guid_in_matches_set_members_and_empty_set_matches_nothing() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let a = repo.create(&sample_article("feed-1", "a")).unwrap();
    let _b = repo.create(&sample_article("feed-1", "b")).unwrap();
    let c = repo.create(&sample_article("feed-1", "c")).unwrap();

    let found = summary_ids(
        &repo,
        &ArticleCriteria::new().with_guid_in(["a", "c", "unknown"]),
    );
    assert_eq!(found, vec![a, c]);

    let none = summary_ids(&repo, &ArticleCriteria::new().with_guid_in(Vec::<String>::new()));
    assert!(none.is_empty());
}

#[test]
fn publication_date_min_is_strict() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let bound = 1_700_000_000_000;
    let mut at_bound = sample_article("feed-1", "at-bound");
    at_bound.publication_date = Some(bound);
    let mut after_bound = sample_article("feed-1", "after-bound");
    after_bound.publication_date = Some(bound + 1);
    let undated = sample_article("feed-1", "undated");

    repo.create(&at_bound).unwrap();
    let after_id = repo.create(&after_bound).unwrap();
    repo.create(&undated).unwrap();

    let found = summary_ids(
        &repo,
        &ArticleCriteria::new().with_publication_date_min(bound),
    );
    assert_eq!(found, vec![after_id]);
}

#[test]
fn results_are_ordered_by_create_date_ascending() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let newest = repo.create(&sample_article("feed-1", "newest")).unwrap();
    let oldest = repo.create(&sample_article("feed-1", "oldest")).unwrap();
    let middle = repo.create(&sample_article("feed-1", "middle")).unwrap();
    set_create_date(&conn, newest, 3_000);
    set_create_date(&conn, oldest, 1_000);
    set_create_date(&conn, middle, 2_000);

    let found = summary_ids(&repo, &ArticleCriteria::new().with_feed_id("feed-1"));
    assert_eq!(found, vec![oldest, middle, newest]);
}

#[test]
fn find_first_returns_none_without_matches() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();
    repo.create(&sample_article("feed-1", "a")).unwrap();

    let first = repo
        .find_first_by_criteria(&ArticleCriteria::new().with_feed_id("feed-unknown"))
        .unwrap();
    assert!(first.is_none());
}

#[test]
fn find_first_returns_earliest_created_match() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let later = repo.create(&sample_article("feed-1", "dup")).unwrap();
    let earlier = repo.create(&sample_article("feed-1", "dup")).unwrap();
    set_create_date(&conn, later, 20);
    set_create_date(&conn, earlier, 10);

    let first = repo
        .find_first_by_criteria(&ArticleCriteria::new().with_guid_in(["dup"]))
        .unwrap()
        .unwrap();
    assert_eq!(first.id, earlier);
    assert_eq!(first.guid, "dup");
}

#[test]
fn equal_create_dates_fall_back_to_insertion_order() {
    let conn = open_db_with_feeds(&["feed-1"]);
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let ids: Vec<ArticleId> = ["x", "y", "z"]
        .iter()
        .map(|guid| repo.create(&sample_article("feed-1", guid)).unwrap())
        .collect();
    conn.execute("UPDATE articles SET create_date = 42;", [])
        .unwrap();

    assert_eq!(summary_ids(&repo, &ArticleCriteria::new()), ids);
}

fn summary_ids(repo: &SqliteArticleRepository<'_>, criteria: &ArticleCriteria) -> Vec<ArticleId> {
    repo.find_by_criteria(criteria)
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect()
}

fn set_create_date(conn: &Connection, id: ArticleId, epoch_ms: i64) {
    conn.execute(
        "UPDATE articles SET create_date = ?1 WHERE id = ?2;",
        params![epoch_ms, id.to_string()],
    )
    .unwrap();
}

fn open_db_with_feeds(feed_ids: &[&str]) -> Connection {
    let conn = open_db_in_memory().unwrap();
    for feed_id in feed_ids {
        conn.execute(
            "INSERT INTO feeds (id, url, create_date) VALUES (?1, ?2, 0);",
            params![feed_id, format!("https://{feed_id}.example.com/rss")],
        )
        .unwrap();
    }
    conn
}

fn sample_article(feed_id: &str, guid: &str) -> NewArticle {
    NewArticle::new(
        feed_id,
        format!("https://example.com/{guid}"),
        "https://example.com/",
        guid,
        format!("Title {guid}"),
    )
}
