use glob::Pattern;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

use stencil_error::{Result, StencilError};

pub type RenderContext = BTreeMap<String, String>;

pub trait Renderer {
    fn render(&self, source: &str, context: &RenderContext) -> Result<String>;
}

/// Replaces `<%= key %>` with the value of `key`. Other `<% %>` tags are left as they are.
pub struct PlaceholderRenderer;

const OPEN: &str = "<%=";
const CLOSE: &str = "%>";

impl Renderer for PlaceholderRenderer {
    fn render(&self, source: &str, context: &RenderContext) -> Result<String> {
        let mut out = String::with_capacity(source.len());
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            let (before, tag) = rest.split_at(start);
            out.push_str(before);

            let Some(end) = tag.find(CLOSE) else {
                return Err(StencilError::TemplateError("unclosed '<%=' tag".to_string()));
            };

            let key = tag.get(OPEN.len()..end).unwrap_or_default().trim();
            let value = context.get(key).ok_or_else(|| {
                StencilError::TemplateError(format!("unknown variable '{key}'"))
            })?;
            out.push_str(value);

            rest = tag.get(end + CLOSE.len()..).unwrap_or_default();
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Renders every text file under `dir` in place, skipping paths matching
/// one of the `ignore` globs (relative to `dir`) and files that are not UTF-8.
/// Returns the number of files rewritten.
pub fn render_dir(
    dir: &Path,
    ignore: &[String],
    renderer: &impl Renderer,
    context: &RenderContext,
) -> Result<usize> {
    let patterns = ignore
        .iter()
        .map(|glob| {
            Pattern::new(glob)
                .map_err(|e| StencilError::TemplateError(format!("invalid ignore glob '{glob}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            let relative = path.strip_prefix(dir).unwrap_or(path);
            !patterns.iter().any(|p| p.matches_path(relative))
        })
        .collect();

    let mut rendered = 0;
    for path in files {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::InvalidData => continue,
            Err(e) => return Err(e.into()),
        };

        let output = renderer.render(&source, context).map_err(|e| {
            StencilError::TemplateError(format!("{}: {e}", path.display()))
        })?;

        if output != source {
            fs::write(&path, output)?;
            rendered += 1;
        }
    }

    Ok(rendered)
}
