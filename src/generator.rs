// Example request generation for apirecon
// Renders every operation of a document to a request file and optionally
// replays it through a proxy

use crate::auth::{build_auth, AuthStrategy};
use crate::config::GenerateConfig;
use crate::engine::ReplayEngine;
use crate::error::Result;
use crate::models::ApiDocument;
use crate::output::RequestWriter;
use crate::parsers::OpenApiParser;
use crate::render::RequestRenderer;
use crate::synth::Synthesizer;
use log::{debug, info, warn};
use std::path::PathBuf;

pub const FALLBACK_HOST: &str = "localhost";

#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub written: Vec<PathBuf>,
    pub replayed: usize,
    pub replay_failures: usize,
}

/// Renderer configured from the document and the run settings.
pub fn renderer_for<'a>(doc: &'a ApiDocument, config: &GenerateConfig) -> RequestRenderer<'a> {
    let synth = Synthesizer::new(doc.schema_registry()).with_max_depth(config.max_depth);
    let host = config
        .host
        .clone()
        .or_else(|| doc.host())
        .unwrap_or_else(|| FALLBACK_HOST.to_string());
    let renderer = RequestRenderer::new(synth, host, doc.base_path());
    match &config.auth {
        Some(auth) => {
            let strategy = build_auth(auth.kind, &auth.value, &auth.api_key_header);
            renderer.with_auth(strategy.auth_header())
        }
        None => renderer,
    }
}

pub async fn generate(doc: &ApiDocument, config: &GenerateConfig) -> Result<GenerationSummary> {
    let mut writer = RequestWriter::recreate(&config.output_dir)?;
    let renderer = renderer_for(doc, config);
    let engine = match &config.proxy {
        Some(proxy) => Some(ReplayEngine::new(proxy, doc.scheme())?),
        None => None,
    };

    let operations = OpenApiParser::operations(doc);
    if operations.is_empty() {
        warn!("no operations found in {}", config.spec.display());
    }

    let mut summary = GenerationSummary::default();
    for op in &operations {
        let request = renderer.render(op);
        let path = writer.write(op, &request.to_wire())?;
        info!("generated request for {} {} -> {}", op.method, op.path, path.display());
        summary.written.push(path);

        if let Some(engine) = &engine {
            if engine.replay(&request).await {
                summary.replayed += 1;
            } else {
                summary.replay_failures += 1;
            }
        }
    }
    debug!(
        "wrote {} request(s) to {}",
        summary.written.len(),
        writer.dir().display()
    );
    Ok(summary)
}
