// Application module
// Wires the controller to the desktop stand-ins for the OS services and drives one session

use crate::cli::ParsedArgs;
use crate::controller::{DisplayOptionsController, HandOff, Services};
use crate::image_loader::load_image;
use crate::library::DirectoryLibrary;
use crate::modes::{canvas_size, ratio_icon};
use crate::presentation::{View, ViewContent, WindowStack};
use crate::share::XdgOpener;
use anyhow::{Context, Result};
use image::DynamicImage;
use log::info;
use std::rc::Rc;

/// Label of the root view the controller belongs to
pub const EDITOR_SCREEN: &str = "process-image";

/// Main application state
pub struct App {
    pub controller: DisplayOptionsController,
    pub windows: Rc<WindowStack>,
    pub library: Rc<DirectoryLibrary>,
}

impl App {
    /// Create the application with the given library and services
    pub fn new<F>(library: DirectoryLibrary, services: F) -> Self
    where
        F: FnOnce(Rc<DirectoryLibrary>, Rc<WindowStack>) -> Services,
    {
        let library = Rc::new(library);
        let windows = Rc::new(WindowStack::with_root(View::screen(EDITOR_SCREEN)));
        let controller =
            DisplayOptionsController::new(services(Rc::clone(&library), Rc::clone(&windows)));

        controller
            .ratio()
            .subscribe(|mode| info!("Ratio: {} ({})", mode, ratio_icon(*mode)));
        controller
            .background()
            .subscribe(|mode| info!("Background: {}", mode));

        Self {
            controller,
            windows,
            library,
        }
    }

    /// Replay button taps
    pub fn tap(&self, ratio_taps: u32, background_taps: u32) {
        for _ in 0..ratio_taps {
            self.controller.ratio_tap().fire();
        }
        for _ in 0..background_taps {
            self.controller.background_tap().fire();
        }
    }

    /// Save `image` into the library and route the completion to the controller
    pub fn save_and_share(&self, image: &DynamicImage) -> HandOff {
        let mut handoff = HandOff::SaveFailed;
        self.library.save_image(image, |outcome| {
            handoff = self.controller.on_asset_save_completed(outcome);
        });
        handoff
    }

    /// Print and dismiss an alert left on top of the screen
    pub fn acknowledge_alerts(&self) {
        if let Some(ViewContent::Alert(alert)) = self.windows.topmost() {
            eprintln!("{}", alert);
            self.windows.acknowledge();
        }
    }
}

/// Run one framing session
pub fn run(args: ParsedArgs) -> Result<()> {
    let image = load_image(&args.source)?;
    info!("Image loaded: {}x{} pixels", image.width(), image.height());

    let library = DirectoryLibrary::create(&args.library)
        .with_context(|| format!("Failed to prepare photo library: {}", args.library.display()))?;
    let target = args.target;
    let app = App::new(library, |library, windows| Services {
        assets: library,
        opener: Rc::new(XdgOpener::new()),
        presenter: windows,
        target,
    });

    app.tap(args.ratio_taps, args.background_taps);

    let state = app.controller.state();
    let (width, height) = canvas_size(image.width(), state.ratio);
    println!(
        "ratio: {} ({}), canvas: {}x{}, background: {}",
        state.ratio,
        ratio_icon(state.ratio),
        width,
        height,
        state.background
    );

    if !args.share {
        return Ok(());
    }

    match app.save_and_share(&image) {
        HandOff::Opened(url) => println!("shared: {}", url),
        HandOff::AlertShown => app.acknowledge_alerts(),
        HandOff::NoAsset => info!("Nothing to share"),
        HandOff::SaveFailed => {}
    }
    Ok(())
}
