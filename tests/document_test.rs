use linked_doc::rdf::vocab::{foaf, rdf, schema, vcard};
use linked_doc::{
    AddSubjectOptions, Client, ClientConfig, DocumentError, Literal, LiteralValue, Method, Quad,
    RdfObject, RdfSubject, RecordingTransport, SubjectState, TransportResponse, TripleSubject,
};
use reqwest::StatusCode;
use std::sync::Arc;

const DOC: &str = "https://document.com/profile";
const ME: &str = "https://document.com/profile#me";
const BOB: &str = "https://document.com/profile#bob";

const PROFILE: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix vcard: <http://www.w3.org/2006/vcard/ns#> .

<#me> a foaf:Person ;
    foaf:name "Alice" ;
    foaf:age 42 ;
    foaf:knows <#bob> ;
    foaf:nick "ally", <https://nick.example/ally> ;
    vcard:hasEmail [ vcard:value <mailto:alice@example.com> ] .

<#bob> a foaf:Person ;
    foaf:name "Bob" .
"#;

fn setup(config: ClientConfig) -> (Client, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let client = Client::with_transport(config, transport.clone());
    (client, transport)
}

fn turtle(body: &str) -> TransportResponse {
    TransportResponse::new(StatusCode::OK)
        .with_header("Content-Type", "text/turtle")
        .with_body(body)
}

async fn fetched_profile() -> (linked_doc::TripleDocument, Arc<RecordingTransport>) {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(Method::Get, turtle(PROFILE));
    let doc = client.fetch_document(DOC).await.unwrap();
    (doc, transport)
}

fn patch_body(transport: &RecordingTransport, index: usize) -> String {
    transport.calls(Method::Patch)[index]
        .body
        .clone()
        .unwrap_or_default()
}

#[tokio::test]
async fn test_fetch_reads_typed_values() {
    let (mut doc, transport) = fetched_profile().await;
    assert_eq!(transport.calls(Method::Get)[0].url, DOC);
    assert!(doc.is_persisted());

    let me = doc.get_subject(ME);
    assert_eq!(me.get_string(foaf::NAME), Some("Alice".to_string()));
    assert_eq!(me.get_integer(foaf::AGE), Some(42));
    assert_eq!(me.get_decimal(foaf::AGE), None);
    assert_eq!(me.get_ref(foaf::KNOWS), Some(BOB.to_string()));
    assert_eq!(me.get_type(), Some(foaf::PERSON.to_string()));
    assert_eq!(me.get_all_strings(foaf::NICK), vec!["ally".to_string()]);
    assert_eq!(
        me.get_all_refs(foaf::NICK),
        vec!["https://nick.example/ally".to_string()]
    );
    assert_eq!(
        me.get_literal(foaf::NAME),
        Some(LiteralValue::String("Alice".to_string()))
    );
    assert_eq!(me.statements().len(), 7);
    assert_eq!(me.document(), DOC);
}

#[tokio::test]
async fn test_subject_identity_is_cached() {
    let (mut doc, _) = fetched_profile().await;
    let first: *const TripleSubject = doc.get_subject(ME);
    let second: *const TripleSubject = doc.get_subject(ME);
    assert!(std::ptr::eq(first, second));

    doc.get_subject(ME).add_literal(foaf::NICK, "al");
    assert!(doc.get_subject(ME).is_dirty());
    assert_eq!(
        doc.subject(&RdfSubject::from(ME)).map(TripleSubject::state),
        Some(SubjectState::Dirty)
    );
}

#[tokio::test]
async fn test_local_subjects_follow_blank_nodes() {
    let (mut doc, _) = fetched_profile().await;
    assert!(doc.get_subject(ME).get_ref(vcard::HAS_EMAIL).is_none());

    let email = doc.get_local_subject(ME, vcard::HAS_EMAIL).unwrap();
    assert!(email.as_node().is_blank_node());
    assert_eq!(
        email.get_ref(vcard::VALUE),
        Some("mailto:alice@example.com".to_string())
    );

    // Local subjects are the cached instances
    let node = doc.get_subject(ME).get_local_node(vcard::HAS_EMAIL).unwrap();
    let local: *const TripleSubject = doc.get_local_subject(ME, vcard::HAS_EMAIL).unwrap();
    let cached: *const TripleSubject = doc.get_subject(node);
    assert!(std::ptr::eq(local, cached));
    assert_eq!(doc.get_all_local_subjects(ME, vcard::HAS_EMAIL).len(), 1);
}

#[tokio::test]
async fn test_local_subject_changes_are_saved() {
    let (mut doc, transport) = fetched_profile().await;
    doc.get_local_subject(ME, vcard::HAS_EMAIL)
        .unwrap()
        .remove_all(vcard::VALUE);
    let saved = doc.save().await.unwrap();

    assert!(saved.iter().any(RdfSubject::is_blank_node));
    let body = patch_body(&transport, 0);
    assert!(body.starts_with("DELETE {"));
    assert!(body.contains("<mailto:alice@example.com>"));
    assert!(!doc.get_local_subject(ME, vcard::HAS_EMAIL).unwrap().is_dirty());
    assert_eq!(
        doc.get_local_subject(ME, vcard::HAS_EMAIL)
            .unwrap()
            .get_ref(vcard::VALUE),
        None
    );
}

#[tokio::test]
async fn test_refetch_does_not_alias_blank_nodes() {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(Method::Get, turtle(PROFILE));
    transport.push_response(
        Method::Get,
        turtle(r#"<#me> <http://www.w3.org/2006/vcard/ns#hasEmail> [ <http://www.w3.org/2006/vcard/ns#value> <mailto:other@example.com> ] ."#),
    );
    let mut first = client.fetch_document(DOC).await.unwrap();
    let old = first.get_subject(ME).get_local_node(vcard::HAS_EMAIL).unwrap();

    let mut second = client.fetch_document(DOC).await.unwrap();
    let new = second.get_subject(ME).get_local_node(vcard::HAS_EMAIL).unwrap();
    assert_ne!(old, new);
    assert_eq!(second.get_subject(old).get_ref(vcard::VALUE), None);
    assert_eq!(
        second.get_subject(new).get_ref(vcard::VALUE),
        Some("mailto:other@example.com".to_string())
    );
}

#[tokio::test]
async fn test_fetch_failure_reports_status() {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(Method::Get, TransportResponse::new(StatusCode::FORBIDDEN));

    let error = client.fetch_document(DOC).await.unwrap_err();
    assert!(matches!(error, DocumentError::Fetch { status: 403, .. }));
    assert_eq!(error.to_string(), "Fetching the Document failed: 403 Forbidden.");

    transport.push_failure(Method::Get, "connection refused");
    let error = client.fetch_document(DOC).await.unwrap_err();
    assert!(matches!(error, DocumentError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_strips_fragment() {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(Method::Get, turtle(PROFILE));
    let doc = client.fetch_document(ME).await.unwrap();
    assert_eq!(doc.as_reference(), DOC);
    assert_eq!(transport.calls(Method::Get)[0].url, DOC);
}

#[tokio::test]
async fn test_find_subjects() {
    let (mut doc, _) = fetched_profile().await;

    let people: Vec<String> = doc
        .get_subjects_of_type(foaf::PERSON)
        .into_iter()
        .map(TripleSubject::as_reference)
        .collect();
    assert_eq!(people, vec![ME.to_string(), BOB.to_string()]);

    let bob = doc
        .find_subject(foaf::NAME, Literal::new_simple_literal("Bob"))
        .map(|subject| subject.as_reference());
    assert_eq!(bob, Some(BOB.to_string()));
    assert!(doc
        .find_subject(foaf::NAME, Literal::new_simple_literal("Carol"))
        .is_none());

    // Found subjects are the cached instances
    let found: *const TripleSubject = doc
        .find_subject(foaf::KNOWS, RdfObject::reference(BOB))
        .unwrap();
    let cached: *const TripleSubject = doc.get_subject(ME);
    assert!(std::ptr::eq(found, cached));
}

#[tokio::test]
async fn test_find_predicates_and_objects() {
    let (doc, _) = fetched_profile().await;
    assert_eq!(
        doc.find_predicate(ME, RdfObject::reference(BOB)),
        Some(foaf::KNOWS.to_string())
    );
    assert_eq!(
        doc.find_predicates(BOB, RdfObject::reference(foaf::PERSON)),
        vec![rdf::TYPE.to_string()]
    );
    assert_eq!(
        doc.find_object(ME, foaf::KNOWS)
            .and_then(|entity| entity.as_reference().map(str::to_string)),
        Some(BOB.to_string())
    );
    assert_eq!(doc.find_objects(ME, foaf::NICK).len(), 2);
    assert_eq!(doc.statements().len(), 10);
}

#[tokio::test]
async fn test_documents_do_not_see_each_other() {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(
        Method::Get,
        turtle(r#"<https://shared.example/#it> <http://xmlns.com/foaf/0.1/name> "From A" ."#),
    );
    transport.push_response(
        Method::Get,
        turtle(r#"<https://shared.example/#it> <http://xmlns.com/foaf/0.1/name> "From B" ."#),
    );
    let mut a = client.fetch_document("https://a.example/doc").await.unwrap();
    let mut b = client.fetch_document("https://b.example/doc").await.unwrap();

    assert_eq!(
        a.get_subject("https://shared.example/#it").get_all_strings(foaf::NAME),
        vec!["From A".to_string()]
    );
    assert_eq!(
        b.get_subject("https://shared.example/#it").get_all_strings(foaf::NAME),
        vec!["From B".to_string()]
    );
    assert_eq!(client.store().read().unwrap().len(), 2);
}

#[tokio::test]
async fn test_set_replaces_every_value() {
    let (mut doc, transport) = fetched_profile().await;
    let me = doc.get_subject(ME);
    me.set_literal(foaf::NICK, "al");

    let (deletions, additions) = me.pending_statements();
    assert_eq!(deletions.len(), 2);
    assert_eq!(additions.len(), 1);

    doc.save().await.unwrap();
    let body = patch_body(&transport, 0);
    let delete_at = body.find("DELETE DATA").unwrap();
    let insert_at = body.find("INSERT DATA").unwrap();
    assert!(delete_at < insert_at);

    let me = doc.get_subject(ME);
    assert_eq!(me.get_all_strings(foaf::NICK), vec!["al".to_string()]);
    assert!(me.get_all_refs(foaf::NICK).is_empty());
}

#[tokio::test]
async fn test_save_fetched_document_patches() {
    let (mut doc, transport) = fetched_profile().await;
    let subject = doc.add_subject(AddSubjectOptions::new());
    subject.add_literal(schema::NAME, "Some value");
    let node = subject.as_node().clone();

    let saved = doc.save().await.unwrap();
    assert!(saved.contains(&node));
    assert!(transport.calls(Method::Put).is_empty());
    assert_eq!(transport.calls(Method::Patch).len(), 1);

    let request = &transport.calls(Method::Patch)[0];
    assert_eq!(request.url, DOC);
    assert_eq!(request.content_type.as_deref(), Some("application/sparql-update"));
    let body = patch_body(&transport, 0);
    assert!(body.starts_with("INSERT DATA {"));
    assert!(body.contains("\"Some value\""));
    assert!(!body.contains("DELETE"));

    let subject = doc.get_subject(node);
    let (deletions, additions) = subject.pending_statements();
    assert!(deletions.is_empty());
    assert!(additions.is_empty());
    assert_eq!(subject.get_string(schema::NAME), Some("Some value".to_string()));
}

#[tokio::test]
async fn test_failed_save_keeps_pending_changes() {
    let (mut doc, transport) = fetched_profile().await;
    doc.get_subject(ME).add_literal(foaf::NICK, "al");
    transport.push_response(
        Method::Patch,
        TransportResponse::new(StatusCode::INTERNAL_SERVER_ERROR),
    );

    let error = doc.save().await.unwrap_err();
    assert!(matches!(error, DocumentError::Update { status: 500, .. }));
    assert_eq!(
        error.to_string(),
        "Updating the Document failed: 500 Internal Server Error."
    );
    assert_eq!(doc.get_subject(ME).pending_statements().1.len(), 1);
    assert_eq!(doc.get_subject(ME).get_all_strings(foaf::NICK), vec!["ally".to_string()]);

    transport.push_failure(Method::Patch, "connection reset");
    assert!(matches!(
        doc.save().await.unwrap_err(),
        DocumentError::Transport(_)
    ));
    assert!(doc.get_subject(ME).is_dirty());

    // A retry resubmits the same diff
    doc.save().await.unwrap();
    assert_eq!(transport.calls(Method::Patch).len(), 3);
    assert_eq!(patch_body(&transport, 0), patch_body(&transport, 2));
    assert!(!doc.get_subject(ME).is_dirty());
}

#[tokio::test]
async fn test_partial_save() {
    let (mut doc, transport) = fetched_profile().await;
    doc.get_subject(ME).add_literal(foaf::NICK, "first");
    doc.get_subject(BOB).add_literal(foaf::NICK, "second");

    let saved = doc
        .save_subjects(&[RdfSubject::from(ME), RdfSubject::from("https://unknown.example/#x")])
        .await
        .unwrap();
    assert_eq!(saved, vec![RdfSubject::from(ME)]);

    let body = patch_body(&transport, 0);
    assert!(body.contains("\"first\""));
    assert!(!body.contains("\"second\""));
    assert!(!doc.get_subject(ME).is_dirty());
    assert_eq!(doc.get_subject(BOB).pending_statements().1.len(), 1);
}

#[tokio::test]
async fn test_empty_save_sends_nothing() {
    let (mut doc, transport) = fetched_profile().await;
    doc.get_subject(ME);
    let saved = doc.save().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert!(transport.calls(Method::Patch).is_empty());
    assert!(transport.calls(Method::Put).is_empty());
}

#[tokio::test]
async fn test_blank_node_deletions_match_by_pattern() {
    let (mut doc, transport) = fetched_profile().await;
    doc.get_subject(ME).remove_all(vcard::HAS_EMAIL);
    doc.save().await.unwrap();

    let body = patch_body(&transport, 0);
    assert!(body.starts_with("DELETE {"));
    assert!(body.contains("WHERE"));
    assert!(doc.get_subject(ME).get_local_node(vcard::HAS_EMAIL).is_none());
}

#[tokio::test]
async fn test_create_document_puts_on_first_save() {
    let (client, transport) = setup(ClientConfig::default());
    let initial = Quad::new(
        "https://document.com/profile#initial",
        schema::NAME,
        Literal::new_simple_literal("Initial value"),
        "https://ignored.example/",
    );
    let mut doc = client.create_document(DOC, vec![initial]).await.unwrap();
    assert!(!doc.is_persisted());
    assert!(transport.requests().is_empty());
    assert_eq!(doc.acl_ref(), None);

    doc.add_subject(AddSubjectOptions::new())
        .add_literal(schema::NAME, "Some value");
    transport.push_response(
        Method::Put,
        TransportResponse::new(StatusCode::CREATED)
            .with_header("Link", r#"<https://some-acl-url.example>; rel="acl""#),
    );
    doc.save().await.unwrap();

    assert!(transport.calls(Method::Patch).is_empty());
    let puts = transport.calls(Method::Put);
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].url, DOC);
    assert_eq!(puts[0].content_type.as_deref(), Some("text/turtle"));
    let body = puts[0].body.clone().unwrap_or_default();
    assert!(body.contains("Some value"));
    assert!(body.contains("Initial value"));

    assert!(doc.is_persisted());
    assert_eq!(doc.acl_ref(), Some("https://some-acl-url.example/"));
    assert_eq!(doc.statements().len(), 2);

    doc.get_subject("https://document.com/profile#initial")
        .set_literal(schema::NAME, "Changed");
    doc.save().await.unwrap();
    assert_eq!(transport.calls(Method::Put).len(), 1);
    assert_eq!(transport.calls(Method::Patch).len(), 1);
}

#[tokio::test]
async fn test_create_document_initial_statements_are_editable() {
    let (client, transport) = setup(ClientConfig::default());
    let initial_subject = "https://document.com/profile#initial";
    let initial = Quad::new(
        initial_subject,
        schema::NAME,
        Literal::new_simple_literal("Initial value"),
        "https://ignored.example/",
    );
    let mut doc = client.create_document(DOC, vec![initial]).await.unwrap();
    assert_eq!(doc.statements().len(), 1);
    assert_eq!(doc.statements()[0].graph, DOC);
    assert!(doc
        .find_subject(schema::NAME, Literal::new_simple_literal("Initial value"))
        .is_some());

    let subject = doc.get_subject(initial_subject);
    assert_eq!(subject.get_string(schema::NAME), Some("Initial value".to_string()));
    subject.set_literal(schema::NAME, "Changed");
    assert_eq!(subject.pending_statements().0.len(), 1);
    doc.save().await.unwrap();

    let body = transport.calls(Method::Put)[0].body.clone().unwrap_or_default();
    assert!(body.contains("Changed"));
    assert!(!body.contains("Initial value"));
    assert_eq!(
        doc.get_subject(initial_subject).get_all_strings(schema::NAME),
        vec!["Changed".to_string()]
    );
    assert_eq!(doc.statements().len(), 1);
}

#[tokio::test]
async fn test_failed_create_can_be_retried() {
    let (client, transport) = setup(ClientConfig::default());
    let mut doc = client.create_document(DOC, Vec::new()).await.unwrap();
    doc.get_subject(ME).add_literal(foaf::NAME, "Alice");
    transport.push_response(
        Method::Put,
        TransportResponse::new(StatusCode::PRECONDITION_FAILED),
    );

    let error = doc.save().await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "Creating the Document failed: 412 Precondition Failed."
    );
    assert!(!doc.is_persisted());
    assert!(doc.get_subject(ME).is_dirty());

    doc.save().await.unwrap();
    assert!(doc.is_persisted());
    assert_eq!(doc.get_subject(ME).get_string(foaf::NAME), Some("Alice".to_string()));
}

#[tokio::test]
async fn test_eager_create() {
    let config = ClientConfig {
        eager_create: true,
        ..ClientConfig::default()
    };
    let (client, transport) = setup(config);
    let doc = client.create_document(DOC, Vec::new()).await.unwrap();
    assert!(doc.is_persisted());
    assert_eq!(transport.calls(Method::Put).len(), 1);
}

#[tokio::test]
async fn test_add_subject_identifiers() {
    let (client, _) = setup(ClientConfig::default());
    let mut doc = client.create_document(DOC, Vec::new()).await.unwrap();

    let first = doc.add_subject(AddSubjectOptions::new()).as_reference();
    let second = doc.add_subject(AddSubjectOptions::new()).as_reference();
    let prefix = format!("{}#", DOC);
    assert!(first.starts_with(&prefix));
    assert!(first[prefix.len()..].len() > 1);
    assert_ne!(first, second);

    let named = doc
        .add_subject(AddSubjectOptions::new().identifier("me").identifier_prefix("person-"))
        .as_reference();
    assert_eq!(named, "https://document.com/profile#person-me");
}

async fn acl_for(link: &str, url: &str) -> Option<String> {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(Method::Get, turtle("").with_header("Link", link));
    let doc = client.fetch_document(url).await.unwrap();
    doc.acl_ref().map(str::to_string)
}

#[tokio::test]
async fn test_acl_from_link_header() {
    assert_eq!(
        acl_for(r#"<https://mock-acl.com>; rel="acl"; title="Mock ACL", "#, DOC).await,
        Some("https://mock-acl.com/".to_string())
    );
    assert_eq!(
        acl_for(
            r#"<relative-path.ttl.acl>; rel="acl"; title="Mock ACL", "#,
            "https://some-doc.example/relative-path.ttl"
        )
        .await,
        Some("https://some-doc.example/relative-path.ttl.acl".to_string())
    );
    assert_eq!(
        acl_for(
            r#"<https://mock-acl.com>; rel="acl"; title="Mock ACL", <https://mock-acl-2.com>; rel="acl"; title="Mock ACL 2", "#,
            DOC
        )
        .await,
        None
    );

    let (doc, _) = fetched_profile().await;
    assert_eq!(doc.acl_ref(), None);
    assert_eq!(doc.web_socket_ref(), None);
}

#[tokio::test]
async fn test_updates_via_header() {
    let (client, transport) = setup(ClientConfig::default());
    transport.push_response(
        Method::Get,
        turtle("").with_header("Updates-Via", "wss://document.com/"),
    );
    let doc = client.fetch_document(DOC).await.unwrap();
    assert_eq!(doc.web_socket_ref(), Some("wss://document.com/"));
}
