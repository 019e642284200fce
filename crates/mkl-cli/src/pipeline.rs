//! Generation pipeline: patterns → header parse → extraction → render → write.
//!
//! Everything up to the final write is a function of the configuration and
//! the pattern registry, so a failed run leaves no output file behind.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use mkl_config::GeneratorConfig;
use mkl_core::{BindingModel, DeclarationSource, PatternRegistry, extract_all};
use mkl_parser::CHeader;
use mkl_render::Renderer;

use crate::cli::PatternInput;

/// Read and validate the pattern list. Runs before any header is parsed.
pub fn load_registry(input: &PatternInput) -> anyhow::Result<PatternRegistry> {
    let registry = read_registry(input)?;
    if registry.is_empty() {
        tracing::warn!("function list is empty, output will declare no functions");
    } else {
        tracing::info!(patterns = registry.len(), "loaded function list");
    }
    Ok(registry)
}

fn read_registry(input: &PatternInput) -> anyhow::Result<PatternRegistry> {
    match input {
        PatternInput::Stdin => PatternRegistry::from_reader(io::stdin().lock())
            .context("failed to read function list from stdin"),
        PatternInput::File(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read function list {}", path.display()))?;
            PatternRegistry::load(&content)
                .with_context(|| format!("invalid function list {}", path.display()))
        }
    }
}

/// Parse the configured header and extract the matching functions.
pub fn build_model(
    config: &GeneratorConfig,
    registry: &PatternRegistry,
) -> anyhow::Result<BindingModel> {
    let header_path = config.header_path();
    let header = CHeader::parse_file(&header_path, &config.include_dirs)
        .with_context(|| format!("failed to parse {}", header_path.display()))?;

    for diagnostic in header.diagnostics() {
        tracing::warn!(%diagnostic, "PROBLEM");
    }

    let funcs = extract_all(&header, registry);
    let model = BindingModel::new(funcs, registry.desired_func_list().to_vec());
    tracing::info!(
        f32 = model.f32_funcs().len(),
        f64 = model.f64_funcs().len(),
        "built binding model"
    );
    Ok(model)
}

/// Produce the full output text.
pub fn generate(config: &GeneratorConfig, registry: &PatternRegistry) -> anyhow::Result<String> {
    let model = build_model(config, registry)?;
    let renderer = Renderer::new().context("failed to load templates")?;
    renderer
        .render(&model, config)
        .context("failed to render output")
}

/// Write the rendered output in one call.
pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(output = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}
