//! Bundled CSS asset

use anyhow::Result;

use crate::site::OutputDir;

const STYLE: &str = include_str!("../assets/style.css");

/// File name of the stylesheet under the output root.
pub const STYLESHEET: &str = "style.css";

/// Writes the bundled stylesheet to the output root
pub fn write_css_assets(output: &OutputDir) -> Result<()> {
    output.write(STYLESHEET, STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_css_assets() {
        // Arrange
        let temp = tempfile::tempdir().expect("Should create temp directory");
        let output = OutputDir::create(temp.path()).expect("Should create output dir");

        // Act
        write_css_assets(&output).expect("Should write stylesheet");

        // Assert
        let css = std::fs::read_to_string(temp.path().join(STYLESHEET))
            .expect("Should read stylesheet");
        assert!(css.contains(".container"));
    }
}
