//! Edit a document against a scripted transport and show what would be sent

use linked_doc::rdf::vocab::{foaf, rdf, schema};
use linked_doc::{
    AddSubjectOptions, Client, ClientConfig, Method, RecordingTransport, TransportResponse,
};
use reqwest::StatusCode;
use std::sync::Arc;

const DOC: &str = "https://alice.example/notes";

const NOTES: &str = r#"
@prefix schema: <http://schema.org/> .
<#first> a schema:TextDigitalDocument ;
    schema:text "Buy milk" .
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(
        Method::Get,
        TransportResponse::new(StatusCode::OK)
            .with_header("Content-Type", "text/turtle")
            .with_body(NOTES),
    );
    let client = Client::with_transport(ClientConfig::default(), transport.clone());

    let mut notes = client.fetch_document(DOC).await?;
    for note in notes.get_subjects_of_type(schema::TEXT_DIGITAL_DOCUMENT) {
        println!("{}: {:?}", note.as_reference(), note.get_string(schema::TEXT));
    }

    notes
        .get_subject(format!("{}#first", DOC))
        .set_literal(schema::TEXT, "Buy oat milk");
    let note = notes.add_subject(AddSubjectOptions::new().identifier_prefix("note-"));
    note.add_ref(rdf::TYPE, schema::TEXT_DIGITAL_DOCUMENT);
    note.add_literal(schema::TEXT, "Call Bob");
    note.add_ref(foaf::KNOWS, "https://bob.example/profile/card#me");

    let saved = notes.save().await?;
    println!("saved {} subjects", saved.len());
    for request in transport.calls(Method::Patch) {
        println!("PATCH {}\n{}", request.url, request.body.unwrap_or_default());
    }
    Ok(())
}
