//! Renderer
//!
//! Walks a document in node order and builds each node through the
//! toolkit. Interactive widgets are subscribed to the triggers the event
//! normalizer understands and registered so their input can be traced back
//! to a node name.
//!
//! A node that cannot be rendered is skipped with a [`Diagnostic`]; the rest
//! of the document still renders.

use alloc::string::String;
use alloc::vec::Vec;

use mgui_display::{
    Color, ColorSlot, Extent, Layout, Primitive, StateFlags, ToolkitError, Trigger, WidgetHandle,
    WidgetToolkit,
};

use crate::config::GuiConfig;
use crate::document::{Dimensions, Document, NodeKind, NodeView};
use crate::error::{Diagnostic, RenderReport};
use crate::record::{WidgetKind, WidgetRecord};
use crate::registry::{RadioGroup, Registry};

/// Main body color of switches
pub const SWITCH_TRACK_COLOR: Color = Color::new(188, 188, 188);

/// Most options a radio group will build
pub const MAX_RADIO_OPTIONS: usize = 32;

/// Progress bar height when the node does not give one
const DEFAULT_BAR_HEIGHT: i32 = 10;

/// Render every node of `document`
///
/// The caller is expected to have cleared the screen and released the
/// registry beforehand.
pub fn render<T: WidgetToolkit>(
    document: &Document,
    toolkit: &mut T,
    registry: &mut Registry,
    config: &GuiConfig,
) -> RenderReport {
    let dimensions = document.dimensions();
    let mut report = RenderReport {
        width: dimensions.width,
        height: dimensions.height,
        ..RenderReport::default()
    };
    let mut canvas_seen = false;

    for (name, node) in document.nodes() {
        let Some(view) = NodeView::new(name, node) else {
            warn!("Skipping malformed node {}", name);
            report.diagnostics.push(Diagnostic::MalformedNode {
                node: String::from(name),
            });
            continue;
        };
        let Some(kind) = view.kind() else {
            warn!("Skipping node {} of unknown type {}", name, view.type_name());
            report.diagnostics.push(Diagnostic::UnknownType {
                node: String::from(name),
                type_name: String::from(view.type_name()),
            });
            continue;
        };

        let result = match kind {
            NodeKind::Canvas => {
                if canvas_seen {
                    warn!("Second canvas node {} replaces the background", name);
                    report.diagnostics.push(Diagnostic::DuplicateCanvas {
                        node: String::from(name),
                    });
                }
                canvas_seen = true;
                build_canvas(toolkit, &view, dimensions).map(|_| ())
            }
            NodeKind::Widget(kind) => build_widget(toolkit, kind, &view, config).map(|built| {
                let record = WidgetRecord::new(built.handle, kind, name, view.text("event"));
                match built.group {
                    Some(group) => registry.insert_radio(record, group),
                    None => registry.insert(record),
                };
            }),
        };

        if let Err(error) = result {
            warn!("Could not build node {}: {:?}", name, error);
            report.diagnostics.push(Diagnostic::WidgetUnavailable {
                node: String::from(name),
                error,
            });
        }
    }

    report.widgets = registry.len();
    report
}

/// A constructed widget
struct Built {
    handle: WidgetHandle,
    group: Option<RadioGroup>,
}

impl Built {
    fn widget(handle: WidgetHandle) -> Self {
        Self {
            handle,
            group: None,
        }
    }
}

fn build_widget<T: WidgetToolkit>(
    toolkit: &mut T,
    kind: WidgetKind,
    node: &NodeView,
    config: &GuiConfig,
) -> Result<Built, ToolkitError> {
    match kind {
        WidgetKind::Button => build_button(toolkit, node).map(Built::widget),
        WidgetKind::Switch => build_switch(toolkit, node).map(Built::widget),
        WidgetKind::Slider => build_slider(toolkit, node).map(Built::widget),
        WidgetKind::Checkbox => build_checkbox(toolkit, node).map(Built::widget),
        WidgetKind::Textfield => build_textfield(toolkit, node, config).map(Built::widget),
        WidgetKind::Divider => build_divider(toolkit, node).map(Built::widget),
        WidgetKind::Radiobutton => build_radio(toolkit, node),
        WidgetKind::Progressbar => build_progressbar(toolkit, node).map(Built::widget),
    }
}

/// Create a widget and style it, deleting it again if styling fails
fn create_styled<T, F>(
    toolkit: &mut T,
    primitive: Primitive,
    parent: Option<WidgetHandle>,
    style: F,
) -> Result<WidgetHandle, ToolkitError>
where
    T: WidgetToolkit,
    F: FnOnce(&mut T, WidgetHandle) -> Result<(), ToolkitError>,
{
    let handle = toolkit.create(primitive, parent)?;
    match style(toolkit, handle) {
        Ok(()) => Ok(handle),
        Err(e) => {
            let _ = toolkit.delete(handle);
            Err(e)
        }
    }
}

fn px(value: i32) -> Extent {
    Extent::Px(value.clamp(0, i32::from(u16::MAX)) as u16)
}

fn place<T: WidgetToolkit>(
    toolkit: &mut T,
    handle: WidgetHandle,
    node: &NodeView,
) -> Result<(), ToolkitError> {
    let (x, y) = node.position();
    toolkit.set_position(handle, x, y)
}

fn build_canvas<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
    dimensions: Dimensions,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Panel, None, |toolkit, panel| {
        toolkit.set_width(panel, Extent::Px(dimensions.width))?;
        toolkit.set_height(panel, Extent::Px(dimensions.height))?;
        toolkit.center(panel)?;
        toolkit.set_color(panel, ColorSlot::Background, node.color("background"))?;
        toolkit.set_border_width(panel, 0)?;
        toolkit.set_radius(panel, 0)
    })
}

fn build_button<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Button, None, |toolkit, button| {
        toolkit.subscribe(button, Trigger::Clicked)?;
        place(toolkit, button, node)?;
        toolkit.set_height(button, Extent::Content)?;
        toolkit.set_color(button, ColorSlot::Background, node.color("background"))?;

        let label = toolkit.create(Primitive::Label, Some(button))?;
        toolkit.set_text(label, node.text("text"))?;
        toolkit.center(label)?;
        toolkit.set_color(label, ColorSlot::Text, node.color("color"))
    })
}

fn build_switch<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Switch, None, |toolkit, switch| {
        toolkit.subscribe(switch, Trigger::ValueChanged)?;
        if node.flag("state") {
            toolkit.add_state(switch, StateFlags::CHECKED)?;
        }
        place(toolkit, switch, node)?;
        toolkit.set_color(switch, ColorSlot::Background, SWITCH_TRACK_COLOR)?;
        toolkit.set_color(switch, ColorSlot::IndicatorChecked, node.color("color"))
    })
}

fn build_slider<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Slider, None, |toolkit, slider| {
        toolkit.subscribe(slider, Trigger::ValueChanged)?;
        toolkit.subscribe(slider, Trigger::Released)?;
        toolkit.set_width(slider, px(node.int("width")))?;
        place(toolkit, slider, node)?;
        toolkit.set_range(slider, node.int("min"), node.int("max"))?;
        toolkit.set_value(slider, node.int("value"))?;
        let color = node.color("color");
        toolkit.set_color(slider, ColorSlot::Indicator, color)?;
        toolkit.set_color(slider, ColorSlot::Knob, color)
    })
}

fn build_checkbox<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Checkbox, None, |toolkit, checkbox| {
        toolkit.subscribe(checkbox, Trigger::ValueChanged)?;
        if node.flag("state") {
            toolkit.add_state(checkbox, StateFlags::CHECKED)?;
        }
        place(toolkit, checkbox, node)?;
        toolkit.set_text(checkbox, "")?;
        let color = node.color("color");
        toolkit.set_color(checkbox, ColorSlot::IndicatorBorder, color)?;
        toolkit.set_color(checkbox, ColorSlot::Indicator, Color::WHITE)?;
        toolkit.set_color(checkbox, ColorSlot::IndicatorChecked, color)
    })
}

fn build_textfield<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
    config: &GuiConfig,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Label, None, |toolkit, label| {
        place(toolkit, label, node)?;
        toolkit.set_text(label, node.text("text"))?;
        toolkit.set_color(label, ColorSlot::Text, node.color("color"))?;
        match config.font_for(node.int("fontSize")) {
            Some(size) => toolkit.set_font(label, size),
            None => Ok(()),
        }
    })
}

fn build_divider<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    let length = px(node.int("length"));
    let thickness = px(node.int("thickness"));
    let (width, height) = if node.text("orientation") == "vertical" {
        (thickness, length)
    } else {
        (length, thickness)
    };

    create_styled(toolkit, Primitive::Panel, None, |toolkit, panel| {
        place(toolkit, panel, node)?;
        toolkit.set_width(panel, width)?;
        toolkit.set_height(panel, height)?;
        toolkit.set_color(panel, ColorSlot::Background, node.color("color"))?;
        toolkit.set_border_width(panel, 0)?;
        toolkit.set_radius(panel, 0)
    })
}

fn build_radio<T: WidgetToolkit>(toolkit: &mut T, node: &NodeView) -> Result<Built, ToolkitError> {
    let amount = usize::try_from(node.int("amount"))
        .unwrap_or(0)
        .min(MAX_RADIO_OPTIONS);
    let color = node.color("color");
    let mut options = Vec::with_capacity(amount);

    let container = create_styled(toolkit, Primitive::Container, None, |toolkit, container| {
        place(toolkit, container, node)?;
        toolkit.set_width(container, Extent::Content)?;
        toolkit.set_height(container, Extent::Content)?;
        toolkit.set_layout(container, Layout::Column)?;

        for index in 0..amount {
            let option = toolkit.create(Primitive::Checkbox, Some(container))?;
            toolkit.subscribe(option, Trigger::Clicked)?;
            toolkit.set_text(option, node.text_at("labelTexts", index))?;
            toolkit.set_color(option, ColorSlot::IndicatorChecked, color)?;
            if index == 0 {
                toolkit.add_state(option, StateFlags::CHECKED)?;
            }
            options.push(option);
        }
        Ok(())
    })?;

    Ok(Built {
        handle: container,
        group: Some(RadioGroup::new(options)),
    })
}

fn build_progressbar<T: WidgetToolkit>(
    toolkit: &mut T,
    node: &NodeView,
) -> Result<WidgetHandle, ToolkitError> {
    create_styled(toolkit, Primitive::Bar, None, |toolkit, bar| {
        toolkit.set_width(bar, px(node.int("width")))?;
        toolkit.set_height(bar, px(node.int_or("height", DEFAULT_BAR_HEIGHT)))?;
        place(toolkit, bar, node)?;
        toolkit.set_range(bar, node.int_or("min", 0), node.int_or("max", 100))?;
        toolkit.set_value(bar, node.int("value"))?;
        toolkit.set_color(bar, ColorSlot::Indicator, node.color("color"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgui_display::HeadlessToolkit;

    fn render_text(text: &str) -> (HeadlessToolkit, Registry, RenderReport) {
        let document = Document::parse(text).unwrap();
        let mut toolkit = HeadlessToolkit::new();
        let mut registry = Registry::new();
        let report = render(&document, &mut toolkit, &mut registry, &GuiConfig::default());
        (toolkit, registry, report)
    }

    fn doc(nodes: &str) -> String {
        alloc::format!(
            r#"{{"ROOT":{{"type":{{"resolvedName":"CanvasArea"}},"props":{{"width":480,"height":320,"background":{{"r":10,"g":20,"b":30}}}}}}{}}}"#,
            nodes
        )
    }

    fn only(registry: &Registry, kind: WidgetKind) -> WidgetHandle {
        assert_eq!(registry.count(kind), 1);
        registry.records(kind)[0].handle
    }

    #[test]
    fn test_canvas_fills_screen() {
        let (toolkit, registry, report) = render_text(&doc(""));
        assert!(report.is_clean());
        assert!(registry.is_empty());
        let panels = toolkit.find_primitive(Primitive::Panel);
        let canvas = toolkit.widget(panels[0]).unwrap();
        assert_eq!(canvas.width, Extent::Px(480));
        assert_eq!(canvas.height, Extent::Px(320));
        assert_eq!(
            canvas.color(ColorSlot::Background),
            Some(Color::new(10, 20, 30))
        );
        assert_eq!(canvas.border_width, Some(0));
        assert_eq!(canvas.radius, Some(0));
    }

    #[test]
    fn test_button_with_label() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Button_1":{"type":{"resolvedName":"Button"},"props":{"text":"Go","event":"start","pageX":5,"pageY":6,"background":{"r":1,"g":2,"b":3},"color":{"r":255,"g":255,"b":255}}}"#,
        ));
        let handle = only(&registry, WidgetKind::Button);
        assert_eq!(registry.records(WidgetKind::Button)[0].event, "start");

        let button = toolkit.widget(handle).unwrap();
        assert_eq!((button.x, button.y), (5, 6));
        assert_eq!(button.height, Extent::Content);
        assert!(button.is_subscribed(Trigger::Clicked));

        let label = toolkit.children(handle)[0];
        let label = toolkit.widget(label).unwrap();
        assert_eq!(label.text, "Go");
        assert!(label.centered);
        assert_eq!(label.color(ColorSlot::Text), Some(Color::WHITE));
    }

    #[test]
    fn test_switch_and_checkbox_styles() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Switch_1":{"type":{"resolvedName":"Switch"},"props":{"state":true,"color":{"r":1,"g":2,"b":3}}},"Checkbox_1":{"type":{"resolvedName":"Checkbox"},"props":{"state":0,"color":{"r":4,"g":5,"b":6}}}"#,
        ));
        let switch = toolkit.widget(only(&registry, WidgetKind::Switch)).unwrap();
        assert!(switch.is_checked());
        assert_eq!(switch.color(ColorSlot::Background), Some(SWITCH_TRACK_COLOR));
        assert_eq!(
            switch.color(ColorSlot::IndicatorChecked),
            Some(Color::new(1, 2, 3))
        );

        let checkbox = toolkit.widget(only(&registry, WidgetKind::Checkbox)).unwrap();
        assert!(!checkbox.is_checked());
        assert_eq!(checkbox.text, "");
        assert_eq!(checkbox.color(ColorSlot::Indicator), Some(Color::WHITE));
        assert_eq!(
            checkbox.color(ColorSlot::IndicatorBorder),
            Some(Color::new(4, 5, 6))
        );
    }

    #[test]
    fn test_slider_range_and_value() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Slider_1":{"type":{"resolvedName":"Slider"},"props":{"width":300,"min":10,"max":60,"value":75,"color":{"r":1,"g":1,"b":1}}}"#,
        ));
        let slider = toolkit.widget(only(&registry, WidgetKind::Slider)).unwrap();
        assert_eq!(slider.width, Extent::Px(300));
        assert_eq!((slider.min, slider.max, slider.value), (10, 60, 60));
        assert!(slider.is_subscribed(Trigger::ValueChanged));
        assert!(slider.is_subscribed(Trigger::Released));
        assert_eq!(slider.color(ColorSlot::Knob), Some(Color::new(1, 1, 1)));
    }

    #[test]
    fn test_textfield_font_and_event() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Textfield_1":{"type":{"resolvedName":"Textfield"},"props":{"text":"Hi","fontSize":25,"event":"ignored"}}"#,
        ));
        let record = &registry.records(WidgetKind::Textfield)[0];
        assert_eq!(record.event, "NoInput");
        let label = toolkit.widget(record.handle).unwrap();
        assert_eq!(label.text, "Hi");
        assert_eq!(label.font_size, Some(32));
    }

    #[test]
    fn test_vertical_divider_swaps_axes() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Divider_1":{"type":{"resolvedName":"Divider"},"props":{"length":140,"thickness":4,"orientation":"vertical"}},"Divider_2":{"type":{"resolvedName":"Divider"},"props":{"length":140,"thickness":4,"orientation":"horizontal"}}"#,
        ));
        let dividers = registry.records(WidgetKind::Divider);
        let vertical = toolkit.widget(dividers[0].handle).unwrap();
        assert_eq!((vertical.width, vertical.height), (Extent::Px(4), Extent::Px(140)));
        let horizontal = toolkit.widget(dividers[1].handle).unwrap();
        assert_eq!(
            (horizontal.width, horizontal.height),
            (Extent::Px(140), Extent::Px(4))
        );
    }

    #[test]
    fn test_radio_group_options() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Radio_1":{"type":{"resolvedName":"Radiobutton"},"props":{"amount":3,"labelTexts":["Low","Mid"],"event":"mode"}}"#,
        ));
        let container = only(&registry, WidgetKind::Radiobutton);
        assert_eq!(toolkit.widget(container).unwrap().layout, Some(Layout::Column));

        let options = toolkit.children(container);
        assert_eq!(options.len(), 3);
        let labels: Vec<&str> = options
            .iter()
            .map(|h| toolkit.widget(*h).unwrap().text.as_str())
            .collect();
        assert_eq!(labels, ["Low", "Mid", ""]);
        assert!(toolkit.widget(options[0]).unwrap().is_checked());
        assert!(!toolkit.widget(options[1]).unwrap().is_checked());
        assert_eq!(registry.group(0).unwrap().options, options);
    }

    #[test]
    fn test_progressbar_defaults() {
        let (toolkit, registry, _) = render_text(&doc(
            r#","Progress_1":{"type":{"resolvedName":"Progressbar"},"props":{"width":200,"value":40}}"#,
        ));
        let bar = toolkit.widget(only(&registry, WidgetKind::Progressbar)).unwrap();
        assert_eq!(bar.height, Extent::Px(10));
        assert_eq!((bar.min, bar.max, bar.value), (0, 100, 40));
    }

    #[test]
    fn test_unknown_and_malformed_nodes_skipped() {
        let (_, registry, report) = render_text(&doc(
            r#","Chart_1":{"type":{"resolvedName":"Chart"},"props":{}},"Broken":{"props":{}},"Switch_1":{"type":{"resolvedName":"Switch"},"props":{}}"#,
        ));
        assert_eq!(registry.count(WidgetKind::Switch), 1);
        assert_eq!(report.widgets, 1);
        assert_eq!(
            report.diagnostics,
            [
                Diagnostic::UnknownType {
                    node: String::from("Chart_1"),
                    type_name: String::from("Chart"),
                },
                Diagnostic::MalformedNode {
                    node: String::from("Broken"),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_canvas_reported() {
        let (toolkit, _, report) = render_text(&doc(
            r#","Canvas_2":{"type":{"resolvedName":"CanvasArea"},"props":{"background":{"r":0,"g":0,"b":0}}}"#,
        ));
        assert_eq!(toolkit.find_primitive(Primitive::Panel).len(), 2);
        assert_eq!(
            report.diagnostics,
            [Diagnostic::DuplicateCanvas {
                node: String::from("Canvas_2"),
            }]
        );
    }

    #[test]
    fn test_toolkit_exhaustion_skips_widget() {
        let document = Document::parse(&doc(
            r#","Button_1":{"type":{"resolvedName":"Button"},"props":{"text":"A"}}"#,
        ))
        .unwrap();
        // Room for the canvas and the button, not the button label
        let mut toolkit = HeadlessToolkit::with_capacity(2);
        let mut registry = Registry::new();
        let report = render(&document, &mut toolkit, &mut registry, &GuiConfig::default());

        assert!(registry.is_empty());
        assert_eq!(toolkit.live_count(), 1);
        assert_eq!(
            report.diagnostics,
            [Diagnostic::WidgetUnavailable {
                node: String::from("Button_1"),
                error: ToolkitError::OutOfMemory,
            }]
        );
    }
}
