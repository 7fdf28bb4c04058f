use crate::config::TranslatorConfig;

/// Line-oriented text buffer that tracks brace indentation.
pub(crate) struct SourceWriter {
    unit: String,
    level: usize,
    out: String,
}

impl SourceWriter {
    pub(crate) fn new(config: &TranslatorConfig) -> Self {
        Self {
            unit: config.indent_unit(),
            level: 0,
            out: String::new(),
        }
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.level {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn open_block(&mut self) {
        self.line("{");
        self.level += 1;
    }

    pub(crate) fn close_block(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    /// Append already rendered text, re-indented to the current level.
    pub(crate) fn embed(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.blank();
            } else {
                self.line(line);
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_and_embedding() {
        let config = TranslatorConfig {
            indent_width: 2,
            ..TranslatorConfig::default()
        };
        let mut writer = SourceWriter::new(&config);
        writer.line("class A");
        writer.open_block();
        writer.embed("void Run()\n{\n  Go();\n}\n");
        writer.close_block();

        assert_eq!(
            writer.finish(),
            "class A\n{\n  void Run()\n  {\n    Go();\n  }\n}\n"
        );
    }
}
