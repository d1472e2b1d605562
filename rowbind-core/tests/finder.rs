use rowbind_core::memory::MemorySource;
use rowbind_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Record, Default, Debug, Serialize, Deserialize)]
struct Ftp {
    #[tag(sql = "source_ftp_file_name")]
    file_name: String,
    #[tag(sql = "source_ftp_username")]
    username: String,
}

#[derive(Record, Default, Debug)]
#[tag(table = "feeds")]
struct Feed {
    #[tag(sql = "id", cql = "id")]
    id: i64,
    #[tag(sql = "source_file_format", cql = "format")]
    source_file_format: String,
    #[tag(sql = "source_type", cql = "type")]
    source_type: String,
    #[tag(flatten)]
    ftp: Ftp,
}

const COLUMNS: &str = "id, source_file_format, source_type, source_ftp_file_name, source_ftp_username";

fn feed_row(id: i64, username: &str) -> Vec<serde_json::Value> {
    vec![json!(id), json!("csv"), json!("ftp"), json!(format!("{id}.csv")), json!(username)]
}

#[test]
fn test_first_fills_flattened_record() {
    let source = MemorySource::new().row(feed_row(1, "roger"));
    let mut feed = Feed::default();
    {
        let mut model = Model::new(&mut feed, "sql").unwrap();
        first(&mut model, &source, "WHERE source_type = 'ftp'").unwrap();
    }

    assert_eq!(feed.id, 1);
    assert_eq!(feed.ftp.username, "roger");
    assert_eq!(feed.ftp.file_name, "1.csv");
    assert_eq!(
        source.executed()[0].text,
        format!("SELECT {COLUMNS} FROM feeds WHERE source_type = 'ftp' LIMIT 1")
    );
}

#[test]
fn test_find_iterates_with_args() {
    let source = MemorySource::new().row(feed_row(1, "roger")).row(feed_row(2, "klaus"));
    let mut feed = Feed::default();
    let mut model = Model::new(&mut feed, "sql").unwrap();

    let criteria = Criteria::new("WHERE source_type = 'ftp' LIMIT $1").arg(2);
    let mut rows = find(&mut model, &source, criteria).unwrap();

    let mut seen = Vec::new();
    while rows.advance() {
        seen.push((rows.record().id, rows.record().ftp.username.clone()));
    }
    assert_eq!(seen, vec![(1, "roger".to_string()), (2, "klaus".to_string())]);
    assert_eq!(rows.state(), IterState::Exhausted);
    assert!(!rows.advance());

    let statement = &source.executed()[0];
    assert_eq!(statement.text, format!("SELECT {COLUMNS} FROM feeds WHERE source_type = 'ftp' LIMIT $1"));
    assert_eq!(statement.args, vec![json!(2)]);
}

#[test]
fn test_cql_namespace_and_consistency() {
    let source = MemorySource::new().named_row([
        ("id", json!(5)),
        ("format", json!("xml")),
        ("type", json!("http")),
    ]);
    let mut feed = Feed::default();
    let mut model = Model::new(&mut feed, "cql").unwrap();

    let criteria = Criteria::new("WHERE id = ?").arg(5).consistency(Consistency::LocalQuorum);
    first(&mut model, &source, criteria).unwrap();

    assert_eq!(model.record().source_file_format, "xml");
    let statement = &source.executed()[0];
    assert_eq!(statement.text, "SELECT id, format, type FROM feeds WHERE id = ? LIMIT 1");
    assert_eq!(statement.consistency, Some(Consistency::LocalQuorum));
}

#[test]
fn test_source_error_recorded_and_returned() {
    let source = MemorySource::new().failing("connection refused");
    let mut feed = Feed::default();
    let mut model = Model::new(&mut feed, "sql").unwrap();

    let err = find(&mut model, &source, "").unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert_eq!(model.last_error().map(|e| e.to_string()), Some(err.to_string()));

    let err = first(&mut model, &source, "").unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_bad_row_stops_iteration() {
    let mut bad = feed_row(2, "klaus");
    bad[0] = json!("two");
    let source = MemorySource::new().row(feed_row(1, "roger")).row(bad).row(feed_row(3, "hayley"));
    let mut feed = Feed::default();
    let mut model = Model::new(&mut feed, "sql").unwrap();

    let mut rows = find(&mut model, &source, "").unwrap();
    assert!(rows.advance());
    assert!(!rows.advance());
    assert_eq!(rows.state(), IterState::Failed);
    assert!(matches!(rows.error(), Some(Error::Scan { column, .. }) if column == "id"));
    assert!(!rows.advance());
    assert_eq!(rows.into_cursor().remaining(), 1);
}
