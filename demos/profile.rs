//! Print a few fields of a profile document
//!
//! cargo run --example profile -- https://alice.example/profile/card#me

use anyhow::Context;
use linked_doc::rdf::vocab::{foaf, vcard};
use linked_doc::{Client, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let webid = std::env::args()
        .nth(1)
        .context("usage: profile <webid>")?;

    let client = Client::new(ClientConfig::default())?;
    let mut profile = client
        .fetch_document(&webid)
        .await
        .with_context(|| format!("fetching {}", webid))?;

    let me = profile.get_subject(webid.as_str());
    let name = me
        .get_string(foaf::NAME)
        .or_else(|| me.get_string(vcard::FN))
        .unwrap_or_else(|| "(no name)".to_string());
    println!("{}", name);
    for friend in me.get_all_refs(foaf::KNOWS) {
        println!("  knows {}", friend);
    }

    println!("document: {}", profile.as_reference());
    if let Some(acl) = profile.acl_ref() {
        println!("acl: {}", acl);
    }
    if let Some(channel) = profile.web_socket_ref() {
        println!("updates via: {}", channel);
    }
    Ok(())
}
