//! Declarative models of the CSS build configuration.
//!
//! The CSS toolchain is external; this module only describes the two
//! documents it consumes and can materialize them at the locations the
//! tool discovers them. The defaults reproduce the production site's
//! build verbatim.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Glob patterns the build scans to decide which classes are kept.
pub const CONTENT_GLOBS: [&str; 2] = ["content/**/*.md", "layouts/**/*.html"];

/// Search path for `@import` resolution and vendor prefixing.
pub const THEME_DIR: &str = "assets/css";

/// Utility-class generation config (`tailwind.config.js`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityConfig {
    /// Source files scanned for class usage
    pub content: Vec<String>,
    /// Whether the container utility centers itself
    pub center_container: bool,
    /// Active utility plugins, in require order
    pub plugins: Vec<String>,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            content: CONTENT_GLOBS.iter().map(|s| s.to_string()).collect(),
            center_container: true,
            plugins: vec![
                "@tailwindcss/forms".to_string(),
                "@tailwindcss/aspect-ratio".to_string(),
                "@tailwindcss/typography".to_string(),
                "tailwind-children".to_string(),
            ],
        }
    }
}

impl UtilityConfig {
    /// Render the document as the JS config module the build tool loads.
    ///
    /// Built from a template with token substitution so the JS braces
    /// need no escaping.
    pub fn render(&self) -> String {
        let template = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [{{CONTENT}}],
  theme: {
    extend: {},
    container: {
      center: {{CENTER}},
    },
  },
  plugins: [
{{PLUGINS}}
  ],
};
"#;

        let plugins = self
            .plugins
            .iter()
            .map(|p| format!("    require(\"{}\"),", p))
            .collect::<Vec<_>>()
            .join("\n");

        template
            .replace("{{CONTENT}}", &js_string_list(&self.content))
            .replace("{{CENTER}}", &self.center_container.to_string())
            .replace("{{PLUGINS}}", &plugins)
    }
}

/// Minification options for the cssnano pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyOptions {
    /// Strip every comment, including license banners
    pub discard_all_comments: bool,
    /// Collapse whitespace
    pub normalize_whitespace: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            discard_all_comments: true,
            normalize_whitespace: true,
        }
    }
}

/// Post-processing chain config (`postcss.config.js`).
///
/// Plugin order is load-bearing for the external tool and is fixed here:
/// utility framework, import resolution, normalization, vendor
/// prefixing, minification, unused-class removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostcssConfig {
    /// Extra search path for imports and prefixing
    pub theme_dir: PathBuf,
    /// cssnano preset overrides
    pub minify: MinifyOptions,
    /// Source files the unused-class scan reads
    pub purge_content: Vec<String>,
}

impl Default for PostcssConfig {
    fn default() -> Self {
        Self {
            theme_dir: PathBuf::from(THEME_DIR),
            minify: MinifyOptions::default(),
            purge_content: CONTENT_GLOBS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PostcssConfig {
    /// Render the document as the JS config module the build tool loads.
    pub fn render(&self) -> String {
        let template = r#"const path = require("node:path");

const themeDir = path.join(__dirname, {{THEME_DIR}});

/** @type {import('postcss-load-config').Config} */
module.exports = {
  plugins: {
    tailwindcss: {},
    "postcss-import": {
      path: [themeDir],
    },
    "postcss-normalize": {},
    autoprefixer: {
      path: [themeDir],
    },
    cssnano: {
      preset: [
        "default",
        { discardComments: { removeAll: {{DISCARD}} }, normalizeWhitespace: {{WHITESPACE}} },
      ],
    },
    "@fullhuman/postcss-purgecss": {
      content: [{{PURGE}}],
    },
  },
};
"#;

        let theme_dir = self
            .theme_dir
            .components()
            .map(|c| format!("\"{}\"", c.as_os_str().to_string_lossy()))
            .collect::<Vec<_>>()
            .join(", ");

        template
            .replace("{{THEME_DIR}}", &theme_dir)
            .replace("{{DISCARD}}", &self.minify.discard_all_comments.to_string())
            .replace("{{WHITESPACE}}", &self.minify.normalize_whitespace.to_string())
            .replace("{{PURGE}}", &js_string_list(&self.purge_content))
    }
}

/// Write both documents into `dir`, overwriting existing files.
pub fn write_configs(dir: &Path, utility: &UtilityConfig, postcss: &PostcssConfig) -> Result<()> {
    std::fs::write(dir.join("tailwind.config.js"), utility.render())?;
    std::fs::write(dir.join("postcss.config.js"), postcss.render())?;
    Ok(())
}

fn js_string_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utility_defaults_match_site_build() {
        let config = UtilityConfig::default();
        assert_eq!(config.content, vec!["content/**/*.md", "layouts/**/*.html"]);
        assert!(config.center_container);
        assert_eq!(config.plugins.len(), 4);
        assert!(config.plugins.contains(&"@tailwindcss/typography".to_string()));
    }

    #[test]
    fn test_utility_render_declares_plugins() {
        let rendered = UtilityConfig::default().render();
        assert!(rendered.contains("module.exports"));
        assert!(rendered.contains("\"content/**/*.md\", \"layouts/**/*.html\""));
        assert!(rendered.contains("require(\"@tailwindcss/forms\")"));
        assert!(rendered.contains("require(\"tailwind-children\")"));
        assert!(rendered.contains("center: true"));
    }

    #[test]
    fn test_postcss_render_keeps_chain_order() {
        let rendered = PostcssConfig::default().render();
        let order = [
            "tailwindcss",
            "postcss-import",
            "postcss-normalize",
            "autoprefixer",
            "cssnano",
            "@fullhuman/postcss-purgecss",
        ];
        let mut last = 0;
        for plugin in order {
            let at = rendered[last..]
                .find(plugin)
                .unwrap_or_else(|| panic!("{} missing or out of order", plugin));
            last += at + plugin.len();
        }
        assert!(rendered.contains("removeAll: true"));
        assert!(rendered.contains("normalizeWhitespace: true"));
        assert!(rendered.contains("path.join(__dirname, \"assets\", \"css\")"));
    }

    #[test]
    fn test_configs_round_trip_through_serde() {
        let utility = UtilityConfig::default();
        let json = serde_json::to_string(&utility).unwrap();
        let back: UtilityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(utility, back);

        let postcss = PostcssConfig::default();
        let json = serde_json::to_string(&postcss).unwrap();
        let back: PostcssConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(postcss, back);
    }

    #[test]
    fn test_write_configs() {
        let dir = tempfile::tempdir().unwrap();
        write_configs(
            dir.path(),
            &UtilityConfig::default(),
            &PostcssConfig::default(),
        )
        .unwrap();
        assert!(dir.path().join("tailwind.config.js").is_file());
        assert!(dir.path().join("postcss.config.js").is_file());
    }
}
