pub mod buffer;
pub mod cache;
pub mod config;
pub mod diff;
pub mod error;
pub mod patch;
pub mod persist;
pub mod preview;
pub mod proposal;
pub mod registry;
pub mod session;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use buffer::LineBuffer;
use cache::TomlCache;
use config::RendererKind;
use persist::{FilePersister, InvalidatingPersister, MemoryPersister, Persist};
use preview::{InlineOverlay, Renderer, SidePanel};
use session::SessionController;

/// Controller used for reviews of files on disk.
pub type ReviewController = SessionController<LineBuffer, Renderer, Box<dyn Persist>>;

#[derive(Debug, Clone)]
pub struct Redline {
    config: config::Config,
    root: PathBuf,
}

impl Redline {
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self> {
        let root = project_root.as_ref().to_path_buf();
        let config = config::Config::load_or_default(&root)?;

        Ok(Self { config, root })
    }

    pub fn init(project_root: impl AsRef<Path>) -> Result<Self> {
        let project_root = project_root.as_ref();
        config::Config::init(project_root)?;

        Self::new(project_root)
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Renderer from config; `panel` forces the side panel.
    pub fn renderer(&self, panel: bool) -> Renderer {
        let preview = &self.config.data.preview;
        let kind = if panel {
            RendererKind::Panel
        } else {
            preview.renderer
        };

        match kind {
            RendererKind::Inline => Renderer::Inline(InlineOverlay::new(preview.delete_marker.clone())),
            RendererKind::Panel => Renderer::Panel(SidePanel::new(
                preview.add_marker.clone(),
                preview.remove_marker.clone(),
            )),
        }
    }

    /// Turn a raw model answer into the proposed text for `original`.
    pub fn prepare_proposal(&self, raw: &str, original: &str) -> String {
        let code = if self.config.data.proposal.strip_fences {
            proposal::extract_code(raw)
        } else {
            raw.to_string()
        };
        proposal::match_trailing_newline(&code, original)
    }

    pub fn cache(&self) -> Result<TomlCache> {
        TomlCache::open(&self.root)
    }

    /// Load `file` into a controller ready for `start_session`.
    ///
    /// Returns the controller and the file's current text. A dry run records
    /// writes in memory instead of touching disk.
    pub fn open_review(
        &self,
        file: &Path,
        panel: bool,
        dry_run: bool,
    ) -> Result<(ReviewController, String)> {
        let original = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;

        let persister: Box<dyn Persist> = if dry_run {
            Box::new(MemoryPersister::new())
        } else {
            let mut files = FilePersister::new(&self.config.data.persist);
            files.track(file, &original);
            Box::new(InvalidatingPersister::new(files, self.cache()?))
        };

        let controller = SessionController::new(
            LineBuffer::from_text(&original),
            self.renderer(panel),
            persister,
        );
        Ok((controller, original))
    }
}
