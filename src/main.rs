use anyhow::anyhow;
use eframe::egui;
use inkcalc::app::InkCalcApp;
use inkcalc::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    inkcalc::logging::init(settings.debug_logging);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "InkCalc",
        native_options,
        Box::new(move |_cc| Box::new(InkCalcApp::new(settings))),
    )
    .map_err(|err| anyhow!("failed to run UI: {err}"))?;
    Ok(())
}
