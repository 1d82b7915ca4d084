//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the resolved backend and the Output
//! helper, and returns an ExitCode.

use std::collections::BTreeMap;

use crate::api::{Backend, CatalogClient, CatalogError};
use crate::cli::{
    validate_key, ExitCode, LibraryCmd, Output, ProgressCmd, ProgressResponse, ResolveCmd,
    ResolveResponse,
};
use crate::models::{display_key, format_time, Catalog, EpisodeRef};
use crate::playback::{resolve_source, ResumePrompt};
use crate::progress::ProgressStore;

fn catalog_failure(output: &Output, e: CatalogError) -> ExitCode {
    tracing::error!(error = %e, "catalog fetch failed");
    output.error(
        format!("Cannot connect to backend: {}", e),
        ExitCode::NetworkError,
    )
}

fn print_or_fail<T: serde::Serialize>(output: &Output, data: T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Library Command
// =============================================================================

pub async fn library_cmd(cmd: LibraryCmd, backend: &Backend, output: &Output) -> ExitCode {
    output.info(format!("Fetching {}", backend.catalog_url()));

    let catalog = match CatalogClient::new(backend.clone()).fetch().await {
        Ok(catalog) => catalog,
        Err(e) => return catalog_failure(output, e),
    };

    let catalog = match cmd.series {
        Some(series) => match catalog.seasons(&series) {
            Some(seasons) => Catalog::new(BTreeMap::from([(series, seasons.clone())])),
            None => {
                return output.error(format!("Series not found: {}", series), ExitCode::NotFound)
            }
        },
        None => catalog,
    };

    if output.json {
        return print_or_fail(output, &catalog);
    }

    for series in catalog.series_names() {
        output.line(display_key(series));
        for season in catalog.season_names(series) {
            output.line(format!("  {}", display_key(season)));
            for (index, ep) in catalog.episodes(series, season).unwrap_or_default().iter().enumerate() {
                output.line(format!("    {:>3}  {}", index, ep.name));
            }
        }
    }
    output.info(format!("{} episodes", catalog.episode_count()));
    ExitCode::Success
}

// =============================================================================
// Resolve Command
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, backend: &Backend, output: &Output) -> ExitCode {
    for key in [&cmd.series, &cmd.season] {
        if let Err(e) = validate_key(key) {
            return output.error(e, ExitCode::InvalidArgs);
        }
    }

    let catalog = match CatalogClient::new(backend.clone()).fetch().await {
        Ok(catalog) => catalog,
        Err(e) => return catalog_failure(output, e),
    };

    let target = EpisodeRef::new(&cmd.series, &cmd.season, cmd.index);
    let Some(episode) = catalog.episode(&target) else {
        return output.error(format!("Episode not found: {}", target), ExitCode::NotFound);
    };

    let Some(source) = resolve_source(backend, episode, cmd.supports_adaptive()) else {
        return output.error(
            format!("No compatible video source for {}", episode.name),
            ExitCode::NoSource,
        );
    };

    if output.json {
        return print_or_fail(
            output,
            ResolveResponse {
                series: target.series,
                season: target.season,
                index: target.index,
                name: episode.name.clone(),
                source,
            },
        );
    }

    output.info(format!("{} [{}]", episode.name, source.kind));
    output.line(&source.url);
    ExitCode::Success
}

// =============================================================================
// Progress Command
// =============================================================================

pub async fn progress_cmd(
    cmd: ProgressCmd,
    backend: &Backend,
    store: &ProgressStore,
    output: &Output,
) -> ExitCode {
    if cmd.clear {
        if let Err(e) = store.clear() {
            return output.error(format!("Failed to clear checkpoint: {}", e), ExitCode::Error);
        }
        if output.json {
            return print_or_fail(
                output,
                ProgressResponse {
                    checkpoint: None,
                    episode: None,
                    valid: None,
                    cleared: true,
                },
            );
        }
        output.info("Checkpoint cleared");
        return ExitCode::Success;
    }

    let checkpoint = store.load();

    // Validation is best effort; an unreachable backend leaves it unknown
    let prompt = match &checkpoint {
        None => Ok(None),
        Some(_) => match CatalogClient::new(backend.clone()).fetch().await {
            Ok(catalog) => Ok(ResumePrompt::check(&catalog, checkpoint.clone())),
            Err(e) => {
                tracing::warn!(error = %e, "catalog unavailable, checkpoint not validated");
                Err(e)
            }
        },
    };

    if output.json {
        let (episode, valid) = match (&checkpoint, &prompt) {
            (None, _) => (None, Some(false)),
            (Some(_), Ok(Some(p))) => (Some(p.episode_name().to_string()), Some(true)),
            (Some(_), Ok(None)) => (None, Some(false)),
            (Some(_), Err(_)) => (None, None),
        };
        return print_or_fail(
            output,
            ProgressResponse {
                checkpoint,
                episode,
                valid,
                cleared: false,
            },
        );
    }

    let Some(checkpoint) = checkpoint else {
        output.line("No checkpoint stored");
        return ExitCode::Success;
    };

    match prompt {
        Ok(Some(p)) => output.line(format!(
            "{} ({}) at {}",
            p.episode_name(),
            checkpoint.target(),
            format_time(checkpoint.time)
        )),
        Ok(None) => output.line(format!(
            "{} at {} (not in catalog, will not be offered)",
            checkpoint.target(),
            format_time(checkpoint.time)
        )),
        Err(_) => output.line(format!(
            "{} at {} (backend unreachable, not validated)",
            checkpoint.target(),
            format_time(checkpoint.time)
        )),
    }
    ExitCode::Success
}
