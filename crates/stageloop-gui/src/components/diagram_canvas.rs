use std::collections::HashMap;

use egui_phosphor::regular as ph;
use stageloop_core::{LinkId, StageId};
use stageloop_graph::{
    AnchorSide, CardState, Connection, Diagram, EditorState, LinkChange, LinkRouter, LinkState,
    NodeChange, Rect as DiagramRect, StageNode, Vec2 as DiagramVec2, ViewTransform, link_style,
    phase_colors, stage_style, style,
};

use super::controls::{CanvasControls, ControlAction};
use super::node_editor::{EditorAction, NodeEditor};
use crate::theme::{spacing, to_egui_color};

// Responsibility checklist for the custom canvas:
// - Stage cards (title, description, pencil affordance) and selection
// - Connection handles, drag-connect and click-connect gestures
// - Link curves, hit testing, and the connect preview
// - Pan/zoom, the dot grid, and the controls cluster
// - Edit form overlays for cards in edit mode

// Card metrics in diagram units
const CARD_WIDTH: f32 = 200.0;
const CARD_PADDING: f32 = 12.0;
const CARD_RADIUS: f32 = 6.0;
const TITLE_FONT_SIZE: f32 = 13.0;
const BODY_FONT_SIZE: f32 = 10.5;

const HANDLE_RADIUS: f32 = 4.0;
const HANDLE_HIT_RADIUS: f32 = 9.0;
const GRID_SPACING: f32 = 16.0;
const LINK_HIT_TOLERANCE: f32 = 6.0;
const LINK_HIT_SAMPLES: usize = 64;
const FIT_PADDING: f32 = 60.0;
const ZOOM_STEP: f32 = 1.25;

/// Deltas and gestures produced by one canvas frame. The canvas never
/// touches the diagram itself; the app applies these as batches.
#[derive(Default)]
pub struct CanvasOutput {
    pub node_changes: Vec<NodeChange>,
    pub link_changes: Vec<LinkChange>,
    pub connection: Option<Connection>,
    pub save_edit: Option<StageId>,
    pub cancel_edit: Vec<StageId>,
    pub toggle_lock: bool,
}

struct CardLayout {
    rect: egui::Rect,
    title_galley: std::sync::Arc<egui::Galley>,
    body_galley: std::sync::Arc<egui::Galley>,
}

#[derive(Clone, Copy)]
struct PanState {
    start_pan: DiagramVec2,
    start_pos: egui::Pos2,
}

#[derive(Clone, Copy)]
struct NodeDrag {
    id: StageId,
    /// Pointer offset from the card corner, so the card does not jump
    grab_offset: DiagramVec2,
}

#[derive(Clone, Copy)]
struct PendingConnection {
    source: StageId,
    side: AnchorSide,
    /// Drag-connect releases on the target; click-connect stays armed
    /// until the next click.
    from_drag: bool,
}

pub struct DiagramCanvas {
    view: ViewTransform,
    router: LinkRouter,
    pan_state: Option<PanState>,
    node_drag: Option<NodeDrag>,
    pending: Option<PendingConnection>,
    controls: CanvasControls,
    editor: NodeEditor,
    needs_initial_fit: bool,
}

impl DiagramCanvas {
    pub fn new() -> Self {
        Self {
            view: ViewTransform::new(),
            router: LinkRouter::new(),
            pan_state: None,
            node_drag: None,
            pending: None,
            controls: CanvasControls::new(),
            editor: NodeEditor::new(),
            needs_initial_fit: true,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.view.zoom
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        diagram: &Diagram,
        editor_state: &mut EditorState,
        locked: bool,
        show_grid: bool,
    ) -> CanvasOutput {
        let mut output = CanvasOutput::default();

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
        let viewport_center = rect.center();

        if locked {
            self.pending = None;
            self.node_drag = None;
        }

        // Pinch/wheel zoom, anchored at the pointer
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if response.hovered() && (zoom_delta - 1.0).abs() > f32::EPSILON {
            if let Some(pointer) = response.hover_pos() {
                self.view.zoom_about(
                    zoom_delta,
                    DiagramVec2::new(pointer.x, pointer.y),
                    DiagramVec2::new(viewport_center.x, viewport_center.y),
                );
            }
        }

        if self.needs_initial_fit {
            self.view.fit_bounds(
                measure_bounds(ui, diagram),
                DiagramVec2::new(rect.width(), rect.height()),
                FIT_PADDING,
            );
            self.needs_initial_fit = false;
        }

        let zoom = self.view.zoom;
        let mut layouts: HashMap<StageId, CardLayout> = HashMap::new();
        let mut graph_rects: HashMap<StageId, DiagramRect> = HashMap::new();
        let mut content_bounds = DiagramRect::NOTHING;
        for node in diagram.nodes() {
            let screen_min = self.graph_to_screen(node.position, viewport_center);
            let layout = layout_card(ui, node, zoom, screen_min);
            let graph_rect = DiagramRect::from_pos_size(
                node.position,
                DiagramVec2::new(layout.rect.width() / zoom, layout.rect.height() / zoom),
            );
            content_bounds = content_bounds.union(graph_rect);
            graph_rects.insert(node.id, graph_rect);
            layouts.insert(node.id, layout);
        }

        // Hit testing, most specific first: handles, then cards, then links
        let pointer = response.hover_pos();
        let hovered_handle = if locked {
            None
        } else {
            pointer.and_then(|p| self.handle_at(p, diagram, &graph_rects, viewport_center))
        };
        let hovered_node = pointer.and_then(|p| {
            diagram
                .nodes()
                .iter()
                .rev()
                .find(|node| layouts[&node.id].rect.contains(p))
                .map(|node| node.id)
        });
        let hovered_link = if hovered_handle.is_none() && hovered_node.is_none() {
            pointer.and_then(|p| self.link_at(p, diagram, &graph_rects, viewport_center))
        } else {
            None
        };

        if hovered_handle.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        } else if hovered_node.is_some() && !locked {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Move);
        }

        // Gestures
        if response.drag_started() {
            let origin = response.interact_pointer_pos().unwrap_or(viewport_center);
            if let Some((source, side)) = hovered_handle {
                self.pending = Some(PendingConnection {
                    source,
                    side,
                    from_drag: true,
                });
            } else if let (Some(id), false) = (hovered_node, locked) {
                if !editor_state.is_editing(id) {
                    let pointer_graph = self.screen_to_graph(origin, viewport_center);
                    if let Some(node) = diagram.node(id) {
                        self.node_drag = Some(NodeDrag {
                            id,
                            grab_offset: DiagramVec2::new(
                                pointer_graph.x - node.position.x,
                                pointer_graph.y - node.position.y,
                            ),
                        });
                    }
                }
            } else {
                self.pan_state = Some(PanState {
                    start_pan: self.view.pan,
                    start_pos: origin,
                });
            }
        }

        if response.dragged() {
            if let (Some(drag), Some(pointer)) = (self.node_drag, response.interact_pointer_pos())
            {
                let pointer_graph = self.screen_to_graph(pointer, viewport_center);
                output.node_changes.push(NodeChange::Position {
                    id: drag.id,
                    position: DiagramVec2::new(
                        pointer_graph.x - drag.grab_offset.x,
                        pointer_graph.y - drag.grab_offset.y,
                    ),
                });
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if self.pending.is_none() {
                if let (Some(state), Some(pointer)) =
                    (self.pan_state, response.interact_pointer_pos())
                {
                    self.view.pan = DiagramVec2::new(
                        state.start_pan.x + (pointer.x - state.start_pos.x),
                        state.start_pan.y + (pointer.y - state.start_pos.y),
                    );
                }
            }
        }

        if ui.input(|i| !i.pointer.primary_down()) {
            self.node_drag = None;
            self.pan_state = None;
            if let Some(pending) = self.pending {
                if pending.from_drag {
                    if let Some((target, target_side)) = hovered_handle {
                        output.connection = Some(Connection {
                            source: pending.source,
                            source_side: pending.side,
                            target,
                            target_side,
                        });
                    }
                    self.pending = None;
                }
            }
        }

        let mut pencil_clicked = None;
        if response.clicked() && !locked {
            if let Some((target, target_side)) = hovered_handle {
                match self.pending.take() {
                    Some(pending) => {
                        output.connection = Some(Connection {
                            source: pending.source,
                            source_side: pending.side,
                            target,
                            target_side,
                        });
                    }
                    None => {
                        self.pending = Some(PendingConnection {
                            source: target,
                            side: target_side,
                            from_drag: false,
                        });
                    }
                }
            } else if let Some(id) = hovered_node {
                self.select_only_node(diagram, id, &mut output);
            } else if let Some(id) = hovered_link {
                self.select_only_link(diagram, id, &mut output);
            } else {
                self.pending = None;
                clear_selection(diagram, &mut output);
            }
        }

        // Drawing
        if show_grid {
            self.draw_grid(&painter, rect, viewport_center);
        }

        for link in diagram.links() {
            let (Some(source_rect), Some(target_rect)) = (
                graph_rects.get(&link.source),
                graph_rects.get(&link.target),
            ) else {
                continue;
            };
            let curve = self.router.route_link(
                *source_rect,
                link.source_side,
                *target_rect,
                link.target_side,
            );
            let state = LinkState::new()
                .with_selected(link.selected)
                .with_hovered(hovered_link == Some(link.id));
            let stroke_style = link_style(state);
            let stroke = egui::Stroke::new(
                (stroke_style.width * zoom).max(1.0),
                to_egui_color(stroke_style.color),
            );
            self.draw_curve(&painter, &curve, stroke, viewport_center);
        }

        if let (Some(pending), Some(pointer)) = (self.pending, pointer) {
            if let Some(source_rect) = graph_rects.get(&pending.source) {
                let target = self.screen_to_graph(pointer, viewport_center);
                let curve = self.router.route_to_point(*source_rect, pending.side, target);
                let stroke = egui::Stroke::new(
                    (2.0 * zoom).max(1.0),
                    to_egui_color(style::COLOR_HANDLE_ARMED),
                );
                self.draw_curve(&painter, &curve, stroke, viewport_center);
            }
        }

        for node in diagram.nodes() {
            let layout = &layouts[&node.id];
            if !rect.intersects(layout.rect) {
                continue;
            }
            let state = CardState::new()
                .with_selected(node.selected)
                .with_hovered(hovered_node == Some(node.id));
            draw_card(&painter, layout, node, state, zoom);

            if !locked {
                self.draw_handles(
                    &painter,
                    node.id,
                    graph_rects[&node.id],
                    hovered_handle,
                    viewport_center,
                );
            }

            let editing = editor_state.is_editing(node.id);
            if state.is_hovered && !locked && !editing {
                let pencil_id = ui.id().with(("stage_pencil", node.id));
                let pencil_rect = pencil_rect(layout.rect, zoom);
                let pencil_response = ui.interact(pencil_rect, pencil_id, egui::Sense::click());
                let color = if pencil_response.hovered() {
                    to_egui_color(style::COLOR_FOCUS_BORDER)
                } else {
                    to_egui_color(stage_style(node.phase, state).text)
                };
                painter.text(
                    pencil_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    ph::PENCIL_SIMPLE,
                    egui::FontId::proportional(spacing::SMALL_ICON * zoom),
                    color,
                );
                if pencil_response.clicked() {
                    pencil_clicked = Some(node.id);
                }
            }
        }

        if let Some(id) = pencil_clicked {
            if let Some(node) = diagram.node(id) {
                editor_state.begin(node);
            }
        }

        // Edit forms float over their cards
        for node in diagram.nodes() {
            if !editor_state.is_editing(node.id) {
                continue;
            }
            let anchor = layouts[&node.id].rect.min;
            if let Some(session) = editor_state.session_mut(node.id) {
                match self.editor.ui(ui.ctx(), anchor, node.phase, session) {
                    Some(EditorAction::Save) => output.save_edit = Some(node.id),
                    Some(EditorAction::Cancel) => output.cancel_edit.push(node.id),
                    None => {}
                }
            }
        }

        match self.controls.ui(ui, rect, zoom, locked) {
            Some(ControlAction::ZoomIn) => self.zoom_step(ZOOM_STEP, viewport_center),
            Some(ControlAction::ZoomOut) => self.zoom_step(1.0 / ZOOM_STEP, viewport_center),
            Some(ControlAction::ZoomToFit) => {
                self.view.fit_bounds(
                    content_bounds,
                    DiagramVec2::new(rect.width(), rect.height()),
                    FIT_PADDING,
                );
            }
            Some(ControlAction::ToggleLock) => output.toggle_lock = true,
            None => {}
        }

        output
    }

    fn zoom_step(&mut self, factor: f32, viewport_center: egui::Pos2) {
        let center = DiagramVec2::new(viewport_center.x, viewport_center.y);
        self.view.zoom_about(factor, center, center);
    }

    fn graph_to_screen(&self, pos: DiagramVec2, viewport_center: egui::Pos2) -> egui::Pos2 {
        let center = DiagramVec2::new(viewport_center.x, viewport_center.y);
        let p = self.view.graph_to_screen(pos, center);
        egui::pos2(p.x, p.y)
    }

    fn screen_to_graph(&self, pos: egui::Pos2, viewport_center: egui::Pos2) -> DiagramVec2 {
        let center = DiagramVec2::new(viewport_center.x, viewport_center.y);
        self.view
            .screen_to_graph(DiagramVec2::new(pos.x, pos.y), center)
    }

    fn handle_at(
        &self,
        pointer: egui::Pos2,
        diagram: &Diagram,
        graph_rects: &HashMap<StageId, DiagramRect>,
        viewport_center: egui::Pos2,
    ) -> Option<(StageId, AnchorSide)> {
        let mut best: Option<(f32, (StageId, AnchorSide))> = None;
        for node in diagram.nodes() {
            let rect = graph_rects[&node.id];
            for side in AnchorSide::ALL {
                let pos = self.graph_to_screen(side.anchor_on(rect), viewport_center);
                let dist = pos.distance(pointer);
                if dist <= HANDLE_HIT_RADIUS && best.is_none_or(|(b, _)| dist < b) {
                    best = Some((dist, (node.id, side)));
                }
            }
        }
        best.map(|(_, hit)| hit)
    }

    fn link_at(
        &self,
        pointer: egui::Pos2,
        diagram: &Diagram,
        graph_rects: &HashMap<StageId, DiagramRect>,
        viewport_center: egui::Pos2,
    ) -> Option<LinkId> {
        let graph_pointer = self.screen_to_graph(pointer, viewport_center);
        let tolerance = LINK_HIT_TOLERANCE / self.view.zoom;
        let mut best: Option<(f32, LinkId)> = None;
        for link in diagram.links() {
            let (Some(source_rect), Some(target_rect)) = (
                graph_rects.get(&link.source),
                graph_rects.get(&link.target),
            ) else {
                continue;
            };
            let curve = self.router.route_link(
                *source_rect,
                link.source_side,
                *target_rect,
                link.target_side,
            );
            let dist = curve.point_distance(graph_pointer, LINK_HIT_SAMPLES);
            if dist <= tolerance && best.is_none_or(|(b, _)| dist < b) {
                best = Some((dist, link.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn select_only_node(&self, diagram: &Diagram, id: StageId, output: &mut CanvasOutput) {
        for node in diagram.nodes() {
            let selected = node.id == id;
            if node.selected != selected {
                output.node_changes.push(NodeChange::Select {
                    id: node.id,
                    selected,
                });
            }
        }
        for link in diagram.links() {
            if link.selected {
                output.link_changes.push(LinkChange::Select {
                    id: link.id,
                    selected: false,
                });
            }
        }
    }

    fn select_only_link(&self, diagram: &Diagram, id: LinkId, output: &mut CanvasOutput) {
        for link in diagram.links() {
            let selected = link.id == id;
            if link.selected != selected {
                output.link_changes.push(LinkChange::Select {
                    id: link.id,
                    selected,
                });
            }
        }
        for node in diagram.nodes() {
            if node.selected {
                output.node_changes.push(NodeChange::Select {
                    id: node.id,
                    selected: false,
                });
            }
        }
    }

    fn draw_grid(&self, painter: &egui::Painter, rect: egui::Rect, viewport_center: egui::Pos2) {
        let spacing = GRID_SPACING * self.view.zoom;
        if spacing < 4.0 {
            return;
        }
        let dot_color = to_egui_color(style::COLOR_GRID_DOT);

        let origin = self.graph_to_screen(DiagramVec2::new(0.0, 0.0), viewport_center);
        let first_x = origin.x + ((rect.min.x - origin.x) / spacing).floor() * spacing;
        let first_y = origin.y + ((rect.min.y - origin.y) / spacing).floor() * spacing;

        let mut y = first_y;
        while y <= rect.max.y {
            let mut x = first_x;
            while x <= rect.max.x {
                painter.circle_filled(egui::pos2(x, y), 1.0, dot_color);
                x += spacing;
            }
            y += spacing;
        }
    }

    fn draw_curve(
        &self,
        painter: &egui::Painter,
        curve: &stageloop_graph::CubicBezier,
        stroke: egui::Stroke,
        viewport_center: egui::Pos2,
    ) {
        let to_screen = |p: DiagramVec2| self.graph_to_screen(p, viewport_center);
        let start = to_screen(curve.start);
        let cp1 = to_screen(curve.control1);
        let cp2 = to_screen(curve.control2);
        let end = to_screen(curve.end);

        use egui::epaint::CubicBezierShape;
        let shape = CubicBezierShape::from_points_stroke(
            [start, cp1, cp2, end],
            false,
            egui::Color32::TRANSPARENT,
            stroke,
        );
        painter.add(shape);
    }

    fn draw_handles(
        &self,
        painter: &egui::Painter,
        id: StageId,
        graph_rect: DiagramRect,
        hovered_handle: Option<(StageId, AnchorSide)>,
        viewport_center: egui::Pos2,
    ) {
        let zoom = self.view.zoom;
        for side in AnchorSide::ALL {
            let pos = self.graph_to_screen(side.anchor_on(graph_rect), viewport_center);
            let armed = self
                .pending
                .is_some_and(|p| p.source == id && p.side == side);
            let hovered = hovered_handle == Some((id, side));

            let radius = if hovered || armed {
                (HANDLE_RADIUS + 1.5) * zoom
            } else {
                HANDLE_RADIUS * zoom
            };
            let fill = if armed {
                to_egui_color(style::COLOR_HANDLE_ARMED)
            } else {
                to_egui_color(style::COLOR_HANDLE_FILL)
            };
            painter.circle_filled(pos, radius, fill);
            painter.circle_stroke(
                pos,
                radius,
                egui::Stroke::new(1.0, to_egui_color(style::COLOR_HANDLE_FILL.darken(0.4))),
            );
        }
    }
}

fn measure_bounds(ui: &egui::Ui, diagram: &Diagram) -> DiagramRect {
    let mut bounds = DiagramRect::NOTHING;
    for node in diagram.nodes() {
        let layout = layout_card(ui, node, 1.0, egui::Pos2::ZERO);
        bounds = bounds.union(DiagramRect::from_pos_size(
            node.position,
            DiagramVec2::new(layout.rect.width(), layout.rect.height()),
        ));
    }
    bounds
}

fn layout_card(ui: &egui::Ui, node: &StageNode, zoom: f32, screen_min: egui::Pos2) -> CardLayout {
    let padding = CARD_PADDING * zoom;
    let width = CARD_WIDTH * zoom;
    let wrap_width = width - padding * 2.0;
    let colors = phase_colors(node.phase);
    let text_color = to_egui_color(colors.text);

    let title_galley = ui.painter().layout(
        node.title.clone(),
        egui::FontId::proportional(TITLE_FONT_SIZE * zoom),
        text_color,
        wrap_width,
    );
    let body_galley = ui.painter().layout(
        node.description.clone(),
        egui::FontId::proportional(BODY_FONT_SIZE * zoom),
        text_color.gamma_multiply(0.8),
        wrap_width,
    );

    let height =
        padding + title_galley.size().y + 4.0 * zoom + body_galley.size().y + padding;
    CardLayout {
        rect: egui::Rect::from_min_size(screen_min, egui::vec2(width, height)),
        title_galley,
        body_galley,
    }
}

fn pencil_rect(card_rect: egui::Rect, zoom: f32) -> egui::Rect {
    let size = (spacing::ICON_SIZE + 2.0) * zoom;
    egui::Rect::from_min_size(
        egui::pos2(
            card_rect.max.x - size - 4.0 * zoom,
            card_rect.min.y + 4.0 * zoom,
        ),
        egui::vec2(size, size),
    )
}

fn draw_card(
    painter: &egui::Painter,
    layout: &CardLayout,
    node: &StageNode,
    state: CardState,
    zoom: f32,
) {
    let colors = stage_style(node.phase, state);
    let radius = CARD_RADIUS * zoom;
    let shadow_offset = egui::vec2(0.0, 2.0 * zoom);
    painter.rect_filled(
        layout.rect.translate(shadow_offset),
        radius,
        egui::Color32::from_black_alpha(40),
    );
    painter.rect_filled(layout.rect, radius, to_egui_color(colors.fill));
    let stroke_width = if state.is_selected { 2.0 } else { 1.0 };
    painter.rect_stroke(
        layout.rect,
        radius,
        egui::Stroke::new(stroke_width, to_egui_color(colors.border)),
        egui::StrokeKind::Middle,
    );

    let padding = CARD_PADDING * zoom;
    let title_pos = layout.rect.min + egui::vec2(padding, padding);
    painter.galley(title_pos, layout.title_galley.clone(), to_egui_color(colors.text));
    let body_pos = title_pos + egui::vec2(0.0, layout.title_galley.size().y + 4.0 * zoom);
    painter.galley(body_pos, layout.body_galley.clone(), to_egui_color(colors.text));
}

fn clear_selection(diagram: &Diagram, output: &mut CanvasOutput) {
    for node in diagram.nodes() {
        if node.selected {
            output.node_changes.push(NodeChange::Select {
                id: node.id,
                selected: false,
            });
        }
    }
    for link in diagram.links() {
        if link.selected {
            output.link_changes.push(LinkChange::Select {
                id: link.id,
                selected: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_press() -> egui::Event {
        egui::Event::Key {
            key: egui::Key::Escape,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Drive one headless frame of the canvas inside a plain central panel.
    fn run_canvas_frame(
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        canvas: &mut DiagramCanvas,
        diagram: &Diagram,
        editor_state: &mut EditorState,
    ) -> CanvasOutput {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            events,
            ..Default::default()
        };
        let mut output = CanvasOutput::default();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                output = canvas.ui(ui, rect, diagram, editor_state, false, false);
            });
        });
        output
    }

    #[test]
    fn test_first_frame_fits_the_seeded_diagram() {
        let ctx = egui::Context::default();
        let diagram = Diagram::seeded();
        let mut canvas = DiagramCanvas::new();
        let mut editor_state = EditorState::new();

        run_canvas_frame(&ctx, vec![], &mut canvas, &diagram, &mut editor_state);

        let zoom = canvas.zoom();
        assert!(
            zoom > 0.1 && zoom < 1.0,
            "seed layout should zoom out a little to fit, got {zoom}"
        );
    }

    #[test]
    fn test_escape_cancels_only_the_focused_editor() {
        let ctx = egui::Context::default();
        let diagram = Diagram::seeded();
        let mut canvas = DiagramCanvas::new();
        let mut editor_state = EditorState::new();

        let first = diagram.nodes()[0].id;
        let second = diagram.nodes()[1].id;
        editor_state.begin(&diagram.nodes()[0]);
        editor_state.begin(&diagram.nodes()[1]);
        run_canvas_frame(&ctx, vec![], &mut canvas, &diagram, &mut editor_state);

        // Escape while typing in the second card's title field.
        ctx.memory_mut(|m| m.request_focus(NodeEditor::title_field_id(second)));
        let output = run_canvas_frame(
            &ctx,
            vec![escape_press()],
            &mut canvas,
            &diagram,
            &mut editor_state,
        );
        assert_eq!(output.cancel_edit, vec![second]);
        for id in output.cancel_edit {
            editor_state.cancel(id);
        }
        assert!(editor_state.is_editing(first));
        assert!(!editor_state.is_editing(second));

        // The description field gates the same way.
        ctx.memory_mut(|m| m.request_focus(NodeEditor::description_field_id(first)));
        let output = run_canvas_frame(
            &ctx,
            vec![escape_press()],
            &mut canvas,
            &diagram,
            &mut editor_state,
        );
        assert_eq!(output.cancel_edit, vec![first]);
        for id in output.cancel_edit {
            editor_state.cancel(id);
        }
        assert!(!editor_state.is_editing(first));
    }

    #[test]
    fn test_escape_without_focus_leaves_editors_alone() {
        let ctx = egui::Context::default();
        let diagram = Diagram::seeded();
        let mut canvas = DiagramCanvas::new();
        let mut editor_state = EditorState::new();

        let first = diagram.nodes()[0].id;
        let second = diagram.nodes()[1].id;
        editor_state.begin(&diagram.nodes()[0]);
        editor_state.begin(&diagram.nodes()[1]);
        run_canvas_frame(&ctx, vec![], &mut canvas, &diagram, &mut editor_state);

        let output = run_canvas_frame(
            &ctx,
            vec![escape_press()],
            &mut canvas,
            &diagram,
            &mut editor_state,
        );
        assert!(output.cancel_edit.is_empty());
        assert!(editor_state.is_editing(first));
        assert!(editor_state.is_editing(second));
    }
}
