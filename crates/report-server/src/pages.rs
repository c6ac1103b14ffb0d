//! HTML pages rendered with MiniJinja
//!
//! The four built-in pages are compiled into the binary. A directory of
//! `*.html` files can replace any of them by name at start-up.

use crate::error::{PageError, Result};
use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

/// Base layout extended by every page
pub const BASE: &str = "base.html";
/// Landing page with the ticker form
pub const HOME: &str = "home.html";
/// Successful report
pub const REPORT: &str = "resultado.html";
/// Unknown ticker
pub const NOT_FOUND: &str = "erro.html";

const BUILTIN: [(&str, &str); 4] = [
    (BASE, include_str!("../templates/base.html")),
    (HOME, include_str!("../templates/home.html")),
    (REPORT, include_str!("../templates/resultado.html")),
    (NOT_FOUND, include_str!("../templates/erro.html")),
];

/// Registry of page templates
pub struct PageRenderer {
    env: Environment<'static>,
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}

impl PageRenderer {
    /// Renderer with the built-in pages only
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN {
            env.add_template(name, source)
                .map_err(|e| PageError::TemplateParseFailed {
                    name: name.to_string(),
                    detail: e.to_string(),
                })?;
        }
        Ok(Self { env })
    }

    /// Renderer whose pages may be replaced by `*.html` files in `dir`
    ///
    /// Files are matched by file name, so `dir/resultado.html` replaces the
    /// report page. Other files are registered too and can be extended.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;
        renderer.load_dir(dir)?;
        Ok(renderer)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let entries = std::fs::read_dir(dir).map_err(|e| PageError::FileLoadError {
            path: dir.display().to_string(),
            detail: e.to_string(),
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| PageError::FileLoadError {
                    path: dir.display().to_string(),
                    detail: e.to_string(),
                })?
                .path();

            if !path.is_file() || path.extension().is_none_or(|ext| ext != "html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path).map_err(|e| PageError::FileLoadError {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;

            self.env
                .add_template_owned(name.to_string(), source)
                .map_err(|e| PageError::TemplateParseFailed {
                    name: name.to_string(),
                    detail: e.to_string(),
                })?;

            tracing::debug!(template = name, path = %path.display(), "Loaded page override");
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Render a registered page
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| PageError::TemplateNotFound {
                name: name.to_string(),
                detail: e.to_string(),
            })?;

        template.render(ctx).map_err(|e| PageError::RenderError {
            name: name.to_string(),
            detail: e.to_string(),
        })
    }

    /// Whether a page is registered
    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}
