/*!
 * Integration tests for listing, search and detail resolution
 */

use lexis::rendering::NO_DEFINITION_HTML;
use lexis::{AppError, Dictionary, SchemaOverride, TextDirection};

use crate::common::{create_dictionary, create_glossary};

const GLOSSARY_ORDER: [&str; 8] = [
    "50% rule",
    "<b>bold</b>",
    "acceleration",
    "Force",
    "half_life",
    "Mass",
    "velocity",
    "מהירות",
];

#[tokio::test]
async fn test_listTerms_withoutQuery_shouldReturnAllTermsCaseInsensitiveOrder() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let terms = dictionary.list_terms(None).await.unwrap();

    assert_eq!(terms.items, GLOSSARY_ORDER);
}

#[tokio::test]
async fn test_listTerms_withEmptyQuery_shouldBehaveLikeNoQuery() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let terms = dictionary.list_terms(Some("")).await.unwrap();

    assert_eq!(terms.items.len(), GLOSSARY_ORDER.len());
}

#[tokio::test]
async fn test_listTerms_withQuery_shouldFilterCaseInsensitively() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    assert_eq!(dictionary.list_terms(Some("CE")).await.unwrap().items, ["acceleration", "Force"]);
    assert_eq!(dictionary.list_terms(Some("mass")).await.unwrap().items, ["Mass"]);
    assert!(dictionary.list_terms(Some("quark")).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn test_listTerms_withWildcardCharacters_shouldMatchLiterally() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    assert_eq!(dictionary.list_terms(Some("50%")).await.unwrap().items, ["50% rule"]);
    assert_eq!(dictionary.list_terms(Some("%")).await.unwrap().items, ["50% rule"]);
    assert_eq!(dictionary.list_terms(Some("_")).await.unwrap().items, ["half_life"]);
}

#[tokio::test]
async fn test_listTerms_withManyRows_shouldCapResults() {
    let fixture = create_dictionary(
        r#"
        CREATE TABLE entries (term TEXT, definition TEXT, audio TEXT);
        INSERT INTO entries
            WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 10050)
            SELECT printf('term%05d', i), 'd', NULL FROM n;
        "#,
    )
    .unwrap();
    let dictionary = fixture.open().unwrap();

    let terms = dictionary.list_terms(None).await.unwrap();

    assert_eq!(terms.items.len(), 10_000);
    assert_eq!(terms.items[0], "term00001");
    assert_eq!(terms.items[9_999], "term10000");

    let matches = dictionary.list_terms(Some("TERM")).await.unwrap();
    assert_eq!(matches.items.len(), 10_000);
    assert_eq!(matches.items[9_999], "term10000");
}

#[tokio::test]
async fn test_listTerms_withNonAsciiTerms_shouldSortAndMatchByLowercase() {
    let fixture = create_dictionary(
        r#"
        CREATE TABLE lexicon (term TEXT, definition TEXT, audio TEXT);
        INSERT INTO lexicon VALUES
            ('Борис', 'A name.', NULL),
            ('анна', 'A name.', NULL),
            ('Émile', 'A name.', NULL),
            ('élan', 'Vigour.', NULL),
            ('Ωmega', 'Last letter.', NULL);
        "#,
    )
    .unwrap();
    let dictionary = fixture.open().unwrap();

    assert_eq!(
        dictionary.list_terms(None).await.unwrap().items,
        ["élan", "Émile", "Ωmega", "анна", "Борис"]
    );
    assert_eq!(dictionary.list_terms(Some("БОР")).await.unwrap().items, ["Борис"]);
    assert_eq!(dictionary.list_terms(Some("ωM")).await.unwrap().items, ["Ωmega"]);
    assert_eq!(dictionary.list_terms(Some("É")).await.unwrap().items, ["élan", "Émile"]);
}

#[tokio::test]
async fn test_getTerm_shouldMatchExactlyAndCaseSensitively() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let record = dictionary.get_term("Mass").await.unwrap().unwrap();
    assert_eq!(record.definition, "Amount of matter.");

    assert!(dictionary.get_term("mass").await.unwrap().is_none());
    assert!(dictionary.get_term("Mas").await.unwrap().is_none());
}

#[tokio::test]
async fn test_resolveDetail_withMathAndAudio_shouldBuildFullDetail() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let detail = dictionary.resolve_detail("Force").await.unwrap().unwrap();

    assert_eq!(detail.heading_html, "Force");
    assert_eq!(detail.direction, TextDirection::Ltr);
    assert_eq!(detail.audio.entries(), ["force.mp3", "force-slow.mp3"]);
    assert_eq!(detail.link.as_deref(), Some("https://en.wikipedia.org/wiki/Force"));

    let segments = &detail.body.math_segments;
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].formula, "F");
    assert!(!segments[0].display_mode);
    assert_eq!(segments[1].formula, "F = ma");
    assert!(segments[1].display_mode);
    assert!(detail.body.html_body.contains("data-math-id=\"0\""));
    assert!(detail.body.html_body.contains("data-math-id=\"1\""));
    assert!(!detail.body.html_body.contains('$'));
}

#[tokio::test]
async fn test_resolveDetail_withBlankAudioAndLink_shouldOmitBoth() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let detail = dictionary.resolve_detail("Mass").await.unwrap().unwrap();

    assert!(detail.audio.is_empty());
    assert_eq!(detail.link, None);
}

#[tokio::test]
async fn test_resolveDetail_withNullDefinition_shouldUseNoDefinitionMarker() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let detail = dictionary.resolve_detail("velocity").await.unwrap().unwrap();

    assert_eq!(detail.body.html_body, NO_DEFINITION_HTML);
    assert!(detail.body.is_empty_definition());
}

#[tokio::test]
async fn test_resolveDetail_withMarkupInTerm_shouldEscapeHeading() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let detail = dictionary.resolve_detail("<b>bold</b>").await.unwrap().unwrap();

    assert_eq!(detail.heading_html, "&lt;b&gt;bold&lt;/b&gt;");
    assert_eq!(detail.term, "<b>bold</b>");
}

#[tokio::test]
async fn test_resolveDetail_withHebrewTerm_shouldBeRightToLeft() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    let detail = dictionary.resolve_detail("מהירות").await.unwrap().unwrap();

    assert_eq!(detail.direction, TextDirection::Rtl);
}

#[tokio::test]
async fn test_resolveDetail_withUnknownTerm_shouldReturnNone() {
    let fixture = create_glossary().unwrap();
    let dictionary = fixture.open().unwrap();

    assert!(dictionary.resolve_detail("quark").await.unwrap().is_none());
}

#[test]
fn test_open_withMissingFile_shouldFailWithoutCreatingIt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let result = Dictionary::open(&path, &SchemaOverride::default());

    assert!(matches!(result, Err(AppError::Repository(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_withOverride_shouldReadNamedColumns() {
    let fixture = create_dictionary(
        r#"
        CREATE TABLE aaa (x TEXT, y TEXT, z TEXT);
        CREATE TABLE words (id INTEGER, meaning TEXT, word TEXT, sound TEXT);
        INSERT INTO words VALUES (1, 'A greeting', 'hello', 'hello.ogg');
        "#,
    )
    .unwrap();
    let schema_override = SchemaOverride {
        table: Some("words".to_string()),
        term_column: Some("word".to_string()),
        definition_column: Some("meaning".to_string()),
        audio_column: Some("sound".to_string()),
        link_column: None,
    };
    let dictionary = Dictionary::open(&fixture.path, &schema_override).unwrap();

    tokio_test::block_on(async {
        assert_eq!(dictionary.list_terms(None).await.unwrap().items, ["hello"]);
        let detail = dictionary.resolve_detail("hello").await.unwrap().unwrap();
        assert_eq!(detail.audio.entries(), ["hello.ogg"]);
        assert_eq!(detail.link, None);
    });
}
