/*!
 * Integration tests for debounced search and detail selection
 */

use std::time::Duration;

use lexis::lookup::{DebouncedSearch, DetailSelector, Lookup};

use crate::common::create_glossary;

#[tokio::test]
async fn test_debouncedSearch_singleQuery_shouldReturnCurrentResults() {
    let fixture = create_glossary().unwrap();
    let search = DebouncedSearch::new(fixture.open().unwrap(), Duration::from_millis(5));

    let result = search.search("mass").await.unwrap();

    assert_eq!(result.into_current().unwrap().items, ["Mass"]);
}

#[tokio::test]
async fn test_debouncedSearch_fasterTyping_shouldOnlyKeepLatestQuery() {
    let fixture = create_glossary().unwrap();
    let search = DebouncedSearch::new(fixture.open().unwrap(), Duration::from_millis(200));

    let (first, second) = tokio::join!(search.search("f"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        search.search("force").await
    });

    assert_eq!(first.unwrap(), Lookup::Superseded);
    assert_eq!(second.unwrap().into_current().unwrap().items, ["Force"]);
}

#[tokio::test]
async fn test_debouncedSearch_emptyQuery_shouldListEverything() {
    let fixture = create_glossary().unwrap();
    let search = DebouncedSearch::new(fixture.open().unwrap(), Duration::ZERO);

    let items = search.search("").await.unwrap().into_current().unwrap().items;

    assert_eq!(items.len(), 8);
}

#[tokio::test]
async fn test_detailSelector_sequentialSelections_shouldEachBeCurrent() {
    let fixture = create_glossary().unwrap();
    let selector = DetailSelector::new(fixture.open().unwrap());

    let force = selector.select("Force").await.unwrap().into_current().unwrap();
    assert_eq!(force.unwrap().term, "Force");

    let missing = selector.select("quark").await.unwrap();
    assert_eq!(missing, Lookup::Current(None));
}
