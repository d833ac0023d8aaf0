//! `run` command: extract, transform and load each selected source.

use anteraja_core::{AnnotatedRecord, AppConfig, RawRecord, ResultTable, SourceKind};
use anteraja_sentiment::{
    Dictionary, GoogleTranslator, LanguagePair, PipelineOptions, PlayStoreClient, SentimentError,
    TwitterClient,
};
use anteraja_storage::BlobClient;
use chrono::{DateTime, Utc};

use crate::report;
use crate::SourceArg;

pub(crate) fn selected_sources(arg: SourceArg) -> Vec<SourceKind> {
    match arg {
        SourceArg::Twitter => vec![SourceKind::Twitter],
        SourceArg::PlayStore => vec![SourceKind::PlayStore],
        SourceArg::All => SourceKind::ALL.to_vec(),
    }
}

/// Cutoff applied by the pipeline for `source`, if any.
pub(crate) fn cutoff_for(config: &AppConfig, source: SourceKind) -> Option<DateTime<Utc>> {
    match source {
        SourceKind::Twitter => None,
        SourceKind::PlayStore => config.play_store.cutoff,
    }
}

/// Human-readable plan for `--dry-run`.
pub(crate) fn describe_plan(config: &AppConfig, sources: &[SourceKind], upload: bool) -> String {
    let mut lines = Vec::new();
    for &source in sources {
        let detail = match source {
            SourceKind::Twitter => format!(
                "query {:?}, {} one-day windows from {}, up to {} tweets each",
                config.twitter.query,
                config.twitter.window_days,
                config.twitter.window_start,
                config.twitter.per_window
            ),
            SourceKind::PlayStore => format!(
                "app {} ({}-{}), cutoff {}",
                config.play_store.app_id,
                config.play_store.lang,
                config.play_store.country,
                cutoff_for(config, source)
                    .map_or_else(|| "none".to_string(), |c| c.to_string())
            ),
        };
        lines.push(format!("dry-run: {source}: {detail}"));
        let target = config.output_dir.join(source.blob_name());
        lines.push(format!("dry-run: {source}: write {}", target.display()));
        if upload {
            if let Some(azure) = &config.azure {
                lines.push(format!(
                    "dry-run: {source}: upload to {}/{}/{}",
                    azure.base_url,
                    azure.container,
                    source.blob_name()
                ));
            }
        }
    }
    lines.join("\n")
}

/// Run the ETL for every selected source.
///
/// A source without credentials is skipped with a warning. A source that
/// fails to fetch or export is logged and skipped; the run fails only when
/// every selected source failed.
///
/// # Errors
///
/// Returns an error if the dictionary or HTTP clients cannot be set up, or
/// if all selected sources fail.
pub(crate) async fn run_etl(
    config: &AppConfig,
    source_arg: SourceArg,
    no_upload: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let sources = selected_sources(source_arg);
    let upload = !no_upload && config.azure.is_some();

    if dry_run {
        println!("{}", describe_plan(config, &sources, upload));
        return Ok(());
    }

    let dictionary = crate::load_dictionary(config.dictionary_path.as_deref())?;
    let translator = GoogleTranslator::new(
        &config.translate.url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let blob_client = match (&config.azure, upload) {
        (Some(azure), true) => Some(BlobClient::new(
            azure,
            config.request_timeout_secs,
            &config.user_agent,
        )?),
        _ => None,
    };
    if config.azure.is_none() && !no_upload {
        tracing::warn!("Azure storage not configured; exporting local CSVs only");
    }

    let mut failed_sources = 0usize;
    for &source in &sources {
        let table = match extract(config, source).await {
            Ok(records) => transform(config, source, records, &translator, &dictionary).await,
            Err(SentimentError::MissingCredentials(service)) => {
                tracing::warn!(
                    source = %source,
                    service = %service,
                    "credentials not configured; skipping source"
                );
                continue;
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "source fetch failed");
                failed_sources += 1;
                continue;
            }
        };

        if let Err(e) = load(config, source, &table, blob_client.as_ref()).await {
            tracing::error!(source = %source, error = %e, "export failed");
            failed_sources += 1;
            continue;
        }

        println!("{}", report::render(source, &table));
    }

    if failed_sources > 0 {
        tracing::warn!(
            failed_sources,
            total_sources = sources.len(),
            "some sources failed during the run"
        );
    }
    if failed_sources == sources.len() {
        anyhow::bail!("all {failed_sources} selected sources failed");
    }

    Ok(())
}

async fn extract(config: &AppConfig, source: SourceKind) -> Result<Vec<RawRecord>, SentimentError> {
    match source {
        SourceKind::Twitter => {
            TwitterClient::new(
                &config.twitter,
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_secs,
            )?
            .fetch_all()
            .await
        }
        SourceKind::PlayStore => {
            PlayStoreClient::new(
                &config.play_store,
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_secs,
            )?
            .fetch_all(config.play_store.cutoff)
            .await
        }
    }
}

async fn transform(
    config: &AppConfig,
    source: SourceKind,
    records: Vec<RawRecord>,
    translator: &GoogleTranslator,
    dictionary: &Dictionary,
) -> ResultTable {
    let options = PipelineOptions::new(LanguagePair::new(
        config.translate.source_lang.clone(),
        config.translate.target_lang.clone(),
    ))
    .with_cutoff(cutoff_for(config, source))
    .with_translate_delay_ms(config.translate.delay_ms);

    let table = anteraja_sentiment::run(records, translator, dictionary, &options).await;
    tracing::info!(source = %source, count = table.len(), "source transformed");
    table
}

async fn load(
    config: &AppConfig,
    source: SourceKind,
    table: &[AnnotatedRecord],
    blob_client: Option<&BlobClient>,
) -> anyhow::Result<()> {
    let csv = anteraja_storage::to_csv(table, source)?;
    anteraja_storage::write_local(&config.output_dir, source, &csv)?;

    if let (Some(client), Some(azure)) = (blob_client, &config.azure) {
        client
            .upload(&azure.container, source.blob_name(), csv)
            .await?;
    }
    Ok(())
}
