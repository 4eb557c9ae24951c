use super::Processor;
use crate::plan::Operation;
use crate::utils::Result;
use std::path::{Path, PathBuf};

/// Prints what would happen instead of running ffmpeg.
pub struct DryRunProcessor {
    input: PathBuf,
    operations: Vec<Operation>,
}

impl DryRunProcessor {
    pub fn new<P: Into<PathBuf>>(input: P, operations: Vec<Operation>) -> Self {
        Self {
            input: input.into(),
            operations,
        }
    }

    pub fn render(&self, output: &Path) -> String {
        let mut text = format!("{} -> {}:\n", self.input.display(), output.display());
        for operation in &self.operations {
            text.push_str(&format!("  {}\n", operation));
        }
        text
    }
}

impl Processor for DryRunProcessor {
    fn input(&self) -> &Path {
        &self.input
    }

    fn operations(&self) -> &[Operation] {
        &self.operations
    }

    async fn process(&self, output: &Path) -> Result<()> {
        print!("{}", self.render(output));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{OperationKind, StreamType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_lists_every_operation() {
        let processor = DryRunProcessor::new(
            "/movies/film.mkv",
            vec![
                Operation::new(
                    0,
                    StreamType::Video,
                    OperationKind::convert("hevc", vec!["-profile:v".into(), "veryslow".into()]),
                ),
                Operation::new(1, StreamType::Audio, OperationKind::Copy),
                Operation::new(4, StreamType::Subtitle, OperationKind::Copy),
            ],
        );

        assert_eq!(
            processor.render(Path::new("/slim/film.mkv")),
            "/movies/film.mkv -> /slim/film.mkv:\n\
             \x20 0:0 (video): transcode to hevc\n\
             \x20 0:1 (audio): copy\n\
             \x20 0:4 (subtitle): copy\n"
        );
    }

    #[tokio::test]
    async fn test_process_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mkv");
        let processor = DryRunProcessor::new("in.mkv", Vec::new());

        processor.process(&output).await.unwrap();
        assert!(!output.exists());
    }
}
