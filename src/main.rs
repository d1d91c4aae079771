use anyhow::Context;
use glabels::{
    init_logging, BindingKey, CreateTool, Label, MenuAction, ObjectEditor, ObjectKind, Point,
    Preferences, View, BUILD_DATE, VERSION,
};
use glabels_core::label::text::lines_from_text;
use glabels_core::units::format_length;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("gLabels {} (built {})", VERSION, BUILD_DATE);

    let prefs = load_preferences()?;

    // 3.5" x 2" business card
    let label = Label::new(252.0, 144.0);
    label.set_merge_fields(vec!["NAME".into(), "TITLE".into(), "COLOR".into()]);
    let frame = label.add_object(ObjectKind::Box, 9.0, 9.0, 234.0, 126.0);
    let logo = label.add_object(ObjectKind::Ellipse, 18.0, 18.0, 54.0, 54.0);
    let name = label.add_object(ObjectKind::Text, 90.0, 36.0, 144.0, 36.0);
    name.set_text(lines_from_text("${NAME}\n${TITLE}"));
    label.add_object(ObjectKind::Line, 90.0, 80.0, 144.0, 0.0);

    let view = View::with_memory_scene(&label);
    for _ in 0..prefs.view.background_layers {
        view.add_background_layer()?;
    }
    let keys = view.bind_all()?;
    tracing::info!("Bound {} objects", keys.len());
    log_stacking(&view, "after binding");

    // Click-create a stamp with the default size
    let mut tool = CreateTool::new(ObjectKind::Box, prefs.default_object_size);
    tool.press(&view, Point::new(180.0, 90.0))?;
    let stamp = tool.release(&view, Point::new(180.0, 90.0))?;

    let frame_key = view
        .binding_for(frame.id())
        .context("frame is not bound")?;
    let logo_key = view.binding_for(logo.id()).context("logo is not bound")?;

    view.select_only(logo_key)?;
    view.select(stamp)?;
    view.move_selection(4.5, -2.0)?;
    let position = logo.position();
    tracing::info!(
        "Logo moved to {}, {}",
        format_length(position.x, prefs.units),
        format_length(position.y, prefs.units)
    );

    view.raise_selection_to_top()?;
    log_stacking(&view, "after raising the selection");

    let menu = view.menu(frame_key)?;
    for action in menu.actions() {
        tracing::info!("{} menu: {}", frame_key, action.label());
    }
    view.activate(frame_key, MenuAction::BringToFront)?;
    view.activate(stamp, MenuAction::SendToBack)?;
    log_stacking(&view, "after the menu actions");

    let editor = ObjectEditor::new(&prefs);
    view.attach_dialog(frame_key, Box::new(editor.clone()))?;
    view.activate(frame_key, MenuAction::EditProperties)?;
    editor.choose_fill_key_mode()?;
    editor.choose_fill_key("COLOR")?;
    tracing::info!("Frame fill is now {:?}", frame.fill());

    view.delete_selection()?;
    tracing::info!(
        "{} objects left on the label, {} bindings in the view",
        label.object_count(),
        view.len()
    );
    log_stacking(&view, "after deleting the selection");

    Ok(())
}

fn load_preferences() -> anyhow::Result<Preferences> {
    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match Preferences::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{}, using default preferences", e);
                return Ok(Preferences::default());
            }
        },
    };
    Preferences::load_or_default(&path)
        .with_context(|| format!("loading preferences from {}", path.display()))
}

fn log_stacking(view: &View, when: &str) {
    let order: Vec<String> = view
        .stacking_order()
        .iter()
        .map(|key: &BindingKey| describe(view, *key))
        .collect();
    tracing::info!("Stacking {} (top first): {}", when, order.join(", "));
}

fn describe(view: &View, key: BindingKey) -> String {
    match view.object(key) {
        Ok(object) => format!("{} #{}", object.kind(), object.id()),
        Err(_) => key.to_string(),
    }
}
