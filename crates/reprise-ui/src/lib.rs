#![allow(non_snake_case)]
//! Widgets, flexbox layout, and painting.
//!
//! Widget constructors build a [`View`] tree; [`layout_and_paint`] resolves it
//! through taffy into a [`Scene`] plus hit regions and semantics nodes. Hosts
//! pass that function to [`reprise_core::Stage::compose`], together with their
//! text-field state table and the currently focused widget id.

pub mod textfield;

pub use textfield::{TextField, TextFieldExt, TextFieldState};

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use reprise_core::*;

use crate::textfield::{TF_FONT_DP, TF_PADDING_X_DP};

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: Color::WHITE,
            font_size: 16.0, // dp (converted to px in layout/paint)
        },
    )
}

pub fn Spacer() -> View {
    Box(Modifier::new().flex_grow(1.0))
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(
        0,
        ViewKind::Button {
            text: text.into(),
            on_click: Some(Rc::new(on_click)),
        },
    )
    .semantics(Semantics::new(Role::Button))
}

pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

/// Layout and paint with TextField state injection (Taffy 0.9 API).
///
/// Ids are stamped depth-first starting at 1, so a structurally stable tree
/// keeps stable ids across frames.
pub fn layout_and_paint(
    root: &View,
    size_px_u32: (u32, u32),
    textfield_states: &HashMap<u64, Rc<RefCell<TextFieldState>>>,
    focused: Option<u64>,
) -> (Scene, Vec<HitRegion>, Vec<SemNode>) {
    // Assign ids
    let mut id = 1u64;
    fn stamp(mut v: View, id: &mut u64) -> View {
        v.id = *id;
        *id += 1;
        v.children = v.children.into_iter().map(|c| stamp(c, id)).collect();
        v
    }
    let root = stamp(root.clone(), &mut id);

    // Build Taffy tree (with per-node contexts for measurement)
    use taffy::prelude::*;
    #[derive(Clone)]
    enum NodeCtx {
        Text {
            text: String,
            font_dp: f32, // logical size (dp)
        },
        Button {
            label: String,
        },
        TextField,
        Container,
    }

    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let mut nodes_map: HashMap<ViewId, taffy::NodeId> = HashMap::new();

    fn style_from_modifier(m: &Modifier, kind: &ViewKind, px: &dyn Fn(f32) -> f32) -> Style {
        use taffy::prelude::*;
        let mut s = Style::default();
        s.display = Display::Flex;

        // Flex direction
        if matches!(kind, ViewKind::Row) {
            s.flex_direction = FlexDirection::Row;
        }
        if matches!(kind, ViewKind::Column | ViewKind::Surface) {
            s.flex_direction = FlexDirection::Column;
        }

        // Defaults
        s.align_items = if matches!(
            kind,
            ViewKind::Row | ViewKind::Column | ViewKind::Surface | ViewKind::Box
        ) {
            Some(AlignItems::Stretch)
        } else {
            Some(AlignItems::FlexStart)
        };
        s.justify_content = Some(JustifyContent::FlexStart);

        if let Some(g) = m.flex_grow {
            s.flex_grow = g;
        }

        // Padding (content box). With axis-aware fill below, padding stays
        // inside the allocated box.
        if let Some(p_dp) = m.padding {
            let v = length(px(p_dp));
            s.padding = taffy::geometry::Rect {
                left: v,
                right: v,
                top: v,
                bottom: v,
            };
        }

        // Explicit size — highest priority
        let mut width_set = false;
        let mut height_set = false;
        if let Some(sz_dp) = m.size {
            if sz_dp.width.is_finite() {
                s.size.width = length(px(sz_dp.width.max(0.0)));
                width_set = true;
            }
            if sz_dp.height.is_finite() {
                s.size.height = length(px(sz_dp.height.max(0.0)));
                height_set = true;
            }
        }
        if let Some(w_dp) = m.width {
            s.size.width = length(px(w_dp.max(0.0)));
            width_set = true;
        }
        if let Some(h_dp) = m.height {
            s.size.height = length(px(h_dp.max(0.0)));
            height_set = true;
        }

        // Axis-aware fill: main axis -> weight (flex: 1 1 0%), cross axis ->
        // tight (min==max==100%). The axis is judged from the view's own kind.
        let is_row = matches!(kind, ViewKind::Row);
        let want_fill_w = m.fill_max || m.fill_max_w;
        let want_fill_h = m.fill_max || m.fill_max_h;

        if is_row {
            if want_fill_w && !width_set {
                s.flex_grow = s.flex_grow.max(1.0);
                s.flex_shrink = s.flex_shrink.max(1.0);
                s.flex_basis = length(0.0);
                s.min_size.width = length(0.0);
            }
            if want_fill_h && !height_set {
                s.min_size.height = percent(1.0);
                s.max_size.height = percent(1.0);
            }
        } else {
            // Column-like (Column, Surface, Box, leaves): main axis = vertical
            if want_fill_h && !height_set {
                s.flex_grow = s.flex_grow.max(1.0);
                s.flex_shrink = s.flex_shrink.max(1.0);
                s.flex_basis = length(0.0);
                s.min_size.height = length(0.0); // allow shrinking, avoid min-content expansion
            }
            if want_fill_w && !width_set {
                s.min_size.width = percent(1.0);
                s.max_size.width = percent(1.0);
            }
        }

        // A Surface is usually the root; a bare fill there must still pin the
        // cross axis even though the main-axis weight has no sibling to share
        // against.
        if matches!(kind, ViewKind::Surface) {
            if want_fill_w && s.min_size.width.is_auto() && !width_set {
                s.min_size.width = percent(1.0);
                s.max_size.width = percent(1.0);
            }
            if want_fill_h && s.min_size.height.is_auto() && !height_set {
                s.min_size.height = percent(1.0);
                s.max_size.height = percent(1.0);
            }
        }

        s
    }

    fn build_node(
        v: &View,
        t: &mut TaffyTree<NodeCtx>,
        nodes_map: &mut HashMap<ViewId, taffy::NodeId>,
    ) -> taffy::NodeId {
        let px_helper = |dp_val: f32| dp_to_px(dp_val);
        let style = style_from_modifier(&v.modifier, &v.kind, &px_helper);

        let node = match &v.kind {
            ViewKind::Text {
                text, font_size, ..
            } => t
                .new_leaf_with_context(
                    style,
                    NodeCtx::Text {
                        text: text.clone(),
                        font_dp: *font_size,
                    },
                )
                .unwrap(),
            ViewKind::Button { text, .. } => t
                .new_leaf_with_context(style, NodeCtx::Button { label: text.clone() })
                .unwrap(),
            ViewKind::TextField { .. } => {
                t.new_leaf_with_context(style, NodeCtx::TextField).unwrap()
            }
            _ => {
                let children: Vec<taffy::NodeId> = v
                    .children
                    .iter()
                    .map(|c| build_node(c, t, nodes_map))
                    .collect();
                let n = t.new_with_children(style, &children).unwrap();
                t.set_node_context(n, Some(NodeCtx::Container)).ok();
                n
            }
        };

        nodes_map.insert(v.id, node);
        node
    }

    let root_node = build_node(&root, &mut taffy, &mut nodes_map);

    // Root fills the window regardless of its own modifier.
    {
        let mut rs = taffy.style(root_node).unwrap().clone();
        rs.size.width = length(size_px_u32.0 as f32);
        rs.size.height = length(size_px_u32.1 as f32);
        taffy.set_style(root_node, rs).unwrap();
    }

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size_px_u32.0 as f32),
        height: AvailableSpace::Definite(size_px_u32.1 as f32),
    };

    // Measure function for intrinsic content. Text is single-line; widths are
    // a glyph-width-ish estimate shared with the paint pass below.
    taffy
        .compute_layout_with_measure(root_node, available, |known, _avail, _node, ctx, _style| {
            match ctx {
                Some(NodeCtx::Text { text, font_dp }) => {
                    let size_px_val = dp_to_px(*font_dp);
                    let approx_w_px = text.chars().count() as f32 * size_px_val * 0.6;
                    taffy::geometry::Size {
                        width: known.width.unwrap_or(approx_w_px),
                        height: size_px_val * 1.3,
                    }
                }
                Some(NodeCtx::Button { label }) => taffy::geometry::Size {
                    width: (label.chars().count() as f32 * dp_to_px(16.0) * 0.6) + dp_to_px(24.0),
                    height: dp_to_px(36.0),
                },
                Some(NodeCtx::TextField) => taffy::geometry::Size {
                    width: known.width.unwrap_or(dp_to_px(220.0)),
                    height: dp_to_px(36.0),
                },
                _ => Size::ZERO,
            }
        })
        .unwrap();

    fn layout_of(node: taffy::NodeId, t: &TaffyTree<impl Clone>) -> reprise_core::Rect {
        let l = t.layout(node).unwrap();
        reprise_core::Rect {
            x: l.location.x,
            y: l.location.y,
            w: l.size.width,
            h: l.size.height,
        }
    }

    fn add_offset(mut r: reprise_core::Rect, off: (f32, f32)) -> reprise_core::Rect {
        r.x += off.0;
        r.y += off.1;
        r
    }

    let mut scene = Scene {
        clear_color: theme().background,
        nodes: vec![],
    };
    let mut hits: Vec<HitRegion> = vec![];
    let mut sems: Vec<SemNode> = vec![];

    fn walk(
        v: &View,
        t: &TaffyTree<NodeCtx>,
        nodes: &HashMap<ViewId, taffy::NodeId>,
        scene: &mut Scene,
        hits: &mut Vec<HitRegion>,
        sems: &mut Vec<SemNode>,
        textfield_states: &HashMap<u64, Rc<RefCell<TextFieldState>>>,
        focused: Option<u64>,
        parent_offset_px: (f32, f32),
    ) {
        let local = layout_of(nodes[&v.id], t);
        let rect = add_offset(local, parent_offset_px);

        // Convert padding from dp to px for the content rect
        let content_rect = if let Some(p_dp) = v.modifier.padding {
            let p_px = dp_to_px(p_dp);
            reprise_core::Rect {
                x: rect.x + p_px,
                y: rect.y + p_px,
                w: (rect.w - 2.0 * p_px).max(0.0),
                h: (rect.h - 2.0 * p_px).max(0.0),
            }
        } else {
            rect
        };

        let base_px = (parent_offset_px.0 + local.x, parent_offset_px.1 + local.y);
        let is_focused = focused == Some(v.id);

        // Background/border from the modifier, any kind
        if let Some(bg) = v.modifier.background {
            scene.nodes.push(SceneNode::Rect {
                rect,
                color: bg,
                radius: v.modifier.rounded.map(dp_to_px).unwrap_or(0.0),
            });
        }
        if let Some(b) = &v.modifier.border {
            scene.nodes.push(SceneNode::Border {
                rect,
                color: b.color,
                width: dp_to_px(b.width),
                radius: dp_to_px(b.radius.max(v.modifier.rounded.unwrap_or(0.0))),
            });
        }

        match &v.kind {
            ViewKind::Text {
                text,
                color,
                font_size,
            } => {
                let size_px_val = dp_to_px(*font_size);
                let line_h_px_val = size_px_val * 1.3;

                // Vertical centering within the content box
                let mut draw_box = content_rect;
                let dy_px = (draw_box.h - line_h_px_val) * 0.5;
                if dy_px.is_finite() {
                    draw_box.y += dy_px.max(0.0);
                    draw_box.h = line_h_px_val;
                }

                scene.nodes.push(SceneNode::Text {
                    rect: draw_box,
                    text: text.clone(),
                    color: *color,
                    size: size_px_val,
                });
                sems.push(SemNode {
                    id: v.id,
                    role: Role::Text,
                    label: Some(text.clone()),
                    rect,
                    focused: is_focused,
                    enabled: true,
                });
            }

            ViewKind::Button { text, on_click } => {
                // Default background if none provided
                if v.modifier.background.is_none() {
                    scene.nodes.push(SceneNode::Rect {
                        rect,
                        color: theme().button_bg,
                        radius: v
                            .modifier
                            .rounded
                            .map(dp_to_px)
                            .unwrap_or(dp_to_px(6.0))
                            .max(0.0),
                    });
                }
                // Label
                let label_px = dp_to_px(16.0);
                let approx_w_px = text.chars().count() as f32 * label_px * 0.6;
                let tx = rect.x + (rect.w - approx_w_px).max(0.0) * 0.5;
                let ty = rect.y + (rect.h - label_px).max(0.0) * 0.5;
                scene.nodes.push(SceneNode::Text {
                    rect: reprise_core::Rect {
                        x: tx,
                        y: ty,
                        w: approx_w_px,
                        h: label_px,
                    },
                    text: text.clone(),
                    color: Color::WHITE,
                    size: label_px,
                });

                hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: on_click.clone(),
                    focusable: true,
                    z_index: v.modifier.z_index,
                    on_text_change: None,
                    on_text_submit: None,
                    tf_state_key: None,
                });
                sems.push(SemNode {
                    id: v.id,
                    role: Role::Button,
                    label: Some(text.clone()),
                    rect,
                    focused: is_focused,
                    enabled: true,
                });
                if is_focused {
                    scene.nodes.push(SceneNode::Border {
                        rect,
                        color: theme().focus,
                        width: dp_to_px(2.0),
                        radius: v.modifier.rounded.map(dp_to_px).unwrap_or(dp_to_px(6.0)),
                    });
                }
            }

            ViewKind::TextField {
                state_key,
                hint,
                on_change,
                on_submit,
            } => {
                // Persistent key for host-managed state
                let tf_key = if *state_key != 0 { *state_key } else { v.id };

                hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: None,
                    focusable: true,
                    z_index: v.modifier.z_index,
                    on_text_change: on_change.clone(),
                    on_text_submit: on_submit.clone(),
                    tf_state_key: Some(tf_key),
                });

                let pad_x_px = dp_to_px(TF_PADDING_X_DP);
                let inner = reprise_core::Rect {
                    x: rect.x + pad_x_px,
                    y: rect.y + dp_to_px(8.0),
                    w: (rect.w - 2.0 * pad_x_px).max(0.0),
                    h: (rect.h - dp_to_px(16.0)).max(0.0),
                };

                let value = textfield_states
                    .get(&tf_key)
                    .map(|s| s.borrow().text.clone())
                    .unwrap_or_default();

                if value.is_empty() {
                    scene.nodes.push(SceneNode::Text {
                        rect: inner,
                        text: hint.clone(),
                        color: Color::from_hex("#666666"),
                        size: dp_to_px(TF_FONT_DP),
                    });
                } else {
                    scene.nodes.push(SceneNode::Text {
                        rect: inner,
                        text: value.clone(),
                        color: theme().on_surface,
                        size: dp_to_px(TF_FONT_DP),
                    });
                }

                if is_focused {
                    scene.nodes.push(SceneNode::Border {
                        rect,
                        color: theme().focus,
                        width: dp_to_px(2.0),
                        radius: v.modifier.rounded.map(dp_to_px).unwrap_or(dp_to_px(6.0)),
                    });
                }

                sems.push(SemNode {
                    id: v.id,
                    role: Role::TextField,
                    label: Some(if value.is_empty() { hint.clone() } else { value }),
                    rect,
                    focused: is_focused,
                    enabled: true,
                });
            }

            // Containers paint nothing of their own, but can expose a
            // semantics node through the modifier.
            _ => {
                if let Some(s) = &v.modifier.semantics {
                    sems.push(SemNode {
                        id: v.id,
                        role: s.role,
                        label: s.label.clone(),
                        rect,
                        focused: is_focused,
                        enabled: s.enabled,
                    });
                }
            }
        }

        // Recurse; taffy child locations already include our padding
        for c in &v.children {
            walk(
                c,
                t,
                nodes,
                scene,
                hits,
                sems,
                textfield_states,
                focused,
                base_px,
            );
        }
    }

    walk(
        &root,
        &taffy,
        &nodes_map,
        &mut scene,
        &mut hits,
        &mut sems,
        textfield_states,
        focused,
        (0.0, 0.0),
    );

    // Visual order: low z_index first. Topmost is found by iter().rev().
    hits.sort_by(|a, b| a.z_index.partial_cmp(&b.z_index).unwrap_or(Ordering::Equal));

    (scene, hits, sems)
}

/// Method styling for [`Text`] views.
pub trait TextStyle {
    fn color(self, c: Color) -> View;
    fn size(self, dp: f32) -> View;
}

impl TextStyle for View {
    fn color(mut self, c: Color) -> View {
        if let ViewKind::Text { color, .. } = &mut self.kind {
            *color = c;
        }
        self
    }

    fn size(mut self, dp: f32) -> View {
        if let ViewKind::Text { font_size, .. } = &mut self.kind {
            *font_size = dp;
        }
        self
    }
}
