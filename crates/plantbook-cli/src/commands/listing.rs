use anyhow::{Result, bail};

use plantbook_application::LoadOutcome;

use crate::app::AppContext;
use crate::render;

/// Converts a 1-based listing position to an index.
pub fn to_offset(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

/// `plantbook list`
pub async fn list(app: &AppContext, filter: Option<String>, use_preferences: bool) -> Result<()> {
    let filter_token = if use_preferences {
        app.preferences.load_preferences().await;
        app.preferences.current().await.to_filter_token()
    } else {
        filter.unwrap_or_default()
    };

    let outcome = app.listing.load_plants("", &filter_token).await;
    print_outcome(app, outcome).await
}

/// `plantbook search TERM`
pub async fn search(app: &AppContext, term: &str) -> Result<()> {
    let outcome = app.listing.on_search_submit(term).await;
    print_outcome(app, outcome).await
}

/// `plantbook show INDEX [--search TERM]`
pub async fn show(app: &AppContext, position: usize, search: Option<String>) -> Result<()> {
    let outcome = match search {
        Some(term) => app.listing.on_search_submit(&term).await,
        None => app.listing.activate().await,
    };
    if let LoadOutcome::Failed { message, .. } = outcome {
        bail!("Plant lookup failed: {}", message);
    }

    let record = match to_offset(position) {
        Some(index) => app.listing.select(index).await,
        None => None,
    };
    match record {
        Some(record) => {
            render::print_detail(&record);
            Ok(())
        }
        None => {
            let count = app.listing.snapshot().await.results.len();
            bail!("No plant at position {} ({} results)", position, count)
        }
    }
}

async fn print_outcome(app: &AppContext, outcome: LoadOutcome) -> Result<()> {
    let state = app.listing.snapshot().await;
    render::print_listing(&state);
    match outcome {
        LoadOutcome::Failed { message, .. } => bail!("Plant lookup failed: {}", message),
        _ => Ok(()),
    }
}
