use std::{error::Error, io};

use omnibus::{
    catalogue::Catalogue,
    document::{self, Document},
    router::Router,
    snapshot::{self, Restored},
};
use tracing::{error, info};

enum Mode {
    Build,
    Serve,
}

fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<_> = std::env::args().collect();
    let mode = match args.get(1).map(String::as_str) {
        Some("build") => Mode::Build,
        Some("serve") => Mode::Serve,
        _ => {
            error!("usage: omnibus <build|serve>  (document on stdin)");
            std::process::exit(1);
        }
    };

    let document = match Document::from_reader(io::stdin().lock()) {
        Ok(document) => document,
        Err(err) => {
            error!("failed to read document: {err}");
            std::process::exit(1);
        }
    };

    let result = match mode {
        Mode::Build => build(&document),
        Mode::Serve => serve(&document),
    };
    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}

/// Ingests the document, builds the routable index and persists it.
fn build(document: &Document) -> Result<(), Box<dyn Error>> {
    let path = document.snapshot_path()?;
    let settings = document.routing_settings()?;

    let mut catalogue = Catalogue::new();
    document.apply(&mut catalogue);
    let router = Router::new(&catalogue, settings);
    snapshot::save(path, &catalogue, &router)?;
    info!(path = %path.display(), "build finished");
    Ok(())
}

/// Loads the snapshot and answers the document's stat requests on
/// stdout.
fn serve(document: &Document) -> Result<(), Box<dyn Error>> {
    let path = document.snapshot_path()?;
    let Restored { catalogue, parts } = snapshot::load(path)?;
    let router = Router::from_parts(&catalogue, parts);

    let answers = document::answers(document, &catalogue, &router)?;
    println!("{answers}");
    Ok(())
}
