use crate::{Color, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
    pub radius: f32,
}

/// Layout and paint attributes, attached to a view with [`crate::View::modifier`].
///
/// Dimensions are in dp; `reprise-ui` converts through the ambient `Density`
/// when building the layout tree.
#[derive(Clone, Debug, Default)]
pub struct Modifier {
    pub size: Option<Size>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_max: bool,
    pub fill_max_w: bool,
    pub fill_max_h: bool,
    pub padding: Option<f32>,
    pub background: Option<Color>,
    pub border: Option<Border>,
    /// Corner radius for the background fill (and border, unless the border
    /// carries its own).
    pub rounded: Option<f32>,
    pub flex_grow: Option<f32>,
    pub z_index: f32,
    pub semantics: Option<crate::Semantics>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Size {
            width: w,
            height: h,
        });
        self
    }

    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }

    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }

    pub fn fill_max_size(mut self) -> Self {
        self.fill_max = true;
        self
    }

    pub fn fill_max_width(mut self) -> Self {
        self.fill_max_w = true;
        self
    }

    pub fn fill_max_height(mut self) -> Self {
        self.fill_max_h = true;
        self
    }

    pub fn padding(mut self, p: f32) -> Self {
        self.padding = Some(p);
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.background = Some(c);
        self
    }

    pub fn border(mut self, width: f32, color: Color, radius: f32) -> Self {
        self.border = Some(Border {
            width,
            color,
            radius,
        });
        self
    }

    pub fn rounded(mut self, radius: f32) -> Self {
        self.rounded = Some(radius);
        self
    }

    pub fn flex_grow(mut self, g: f32) -> Self {
        self.flex_grow = Some(g);
        self
    }

    pub fn z_index(mut self, z: f32) -> Self {
        self.z_index = z;
        self
    }

    pub fn semantics(mut self, s: crate::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
}
