use crate::config::{ChartConfig, RenderConfig};
use crate::layout::{
    AxisTitle, ChartLayout, LabelPlacement, PointLayout, RevealPlan, format_em, placement_for,
};
use crate::ir::Side;
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const AXIS_TICK_SIZE: f64 = 6.0;
const AXIS_TICK_PADDING: f64 = 3.0;

/// Small retained SVG tree. Labels need sibling insertion for halos, which
/// plain string building can't express.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, content: &str) -> Self {
        self.child(Node::Text(content.to_string()))
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_markup(out),
                Node::Text(text) => out.push_str(&escape_xml(text)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Sets text-anchor and dx/dy on a label from its side tag.
///
/// Returns `false` and leaves the element untouched for an unknown tag.
pub fn position(text: &mut Element, tag: &str) -> bool {
    match tag.parse::<Side>() {
        Ok(side) => {
            apply_placement(text, placement_for(side));
            true
        }
        Err(err) => {
            tracing::debug!(%err, "label left unpositioned");
            false
        }
    }
}

pub fn apply_placement(text: &mut Element, placement: LabelPlacement) {
    text.set_attr("text-anchor", placement.anchor.as_str());
    if let Some(dx) = placement.dx_em {
        text.set_attr("dx", format_em(dx));
    }
    if let Some(dy) = placement.dy_em {
        text.set_attr("dy", format_em(dy));
    }
}

/// Inserts an outlined copy of `siblings[index]` right before it.
///
/// The copy drops any animation children so it stays static. Returns the
/// new index of the original element, or `None` if `index` is not an
/// element.
pub fn halo(siblings: &mut Vec<Node>, index: usize, color: &str, width: f64) -> Option<usize> {
    let Some(Node::Element(original)) = siblings.get(index) else {
        return None;
    };
    let mut outline = original.clone();
    outline
        .children
        .retain(|child| !matches!(child, Node::Element(el) if is_animation(el)));
    outline.set_attr("fill", "none");
    outline.set_attr("stroke", color);
    outline.set_attr("stroke-width", fmt_num(width));
    outline.set_attr("stroke-linejoin", "round");
    siblings.insert(index, Node::Element(outline));
    Some(index + 1)
}

fn is_animation(el: &Element) -> bool {
    matches!(el.name.as_str(), "animate" | "set")
}

pub fn render_svg(layout: &ChartLayout, theme: &Theme, config: &ChartConfig) -> String {
    build_svg(layout, theme, config).to_markup()
}

pub fn build_svg(layout: &ChartLayout, theme: &Theme, config: &ChartConfig) -> Element {
    let width = fmt_num(layout.width);
    let height = fmt_num(layout.height);
    let mut svg = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", &width)
        .attr("height", &height)
        .attr("viewBox", format!("0 0 {width} {height}"))
        .child(
            Element::new("rect")
                .attr("width", "100%")
                .attr("height", "100%")
                .attr("fill", &theme.background),
        );

    let mut plot = Element::new("g").attr(
        "transform",
        format!(
            "translate({},{})",
            fmt_num(layout.plot_x),
            fmt_num(layout.plot_y)
        ),
    );
    plot.push(x_axis(layout, theme, config));
    plot.push(y_axis(layout, theme, config));
    for title in [&layout.x_title, &layout.y_title] {
        plot.push(axis_title(title, theme, config));
        let last = plot.children.len() - 1;
        halo(&mut plot.children, last, &theme.halo_color, config.halo_stroke_width);
    }

    let animate = config.animate && !layout.reveal.is_instant();
    plot.push(reveal_path(layout, theme, config, animate));

    for point in &layout.points {
        plot.push(
            Element::new("circle")
                .attr("class", "circles")
                .attr("cx", fmt_num(point.x))
                .attr("cy", fmt_num(point.y))
                .attr("r", fmt_num(config.marker_radius))
                .attr("stroke", &theme.marker_stroke)
                .attr("fill", &theme.marker_fill),
        );
    }

    plot.push(labels(&layout.points, &layout.reveal, theme, config));
    svg.push(plot);
    svg
}

fn x_axis(layout: &ChartLayout, theme: &Theme, config: &ChartConfig) -> Element {
    let mut axis = axis_group("axis x-axis", theme, config, "middle").attr(
        "transform",
        format!("translate(0,{})", fmt_num(layout.plot_height)),
    );
    for tick in &layout.x_axis.ticks {
        let tick_line = Element::new("line")
            .attr("stroke", &theme.axis_text_color)
            .attr("y2", fmt_num(AXIS_TICK_SIZE));
        let grid_line = tick_line
            .clone()
            .attr("y1", fmt_num(-layout.plot_height))
            .attr("y2", "0")
            .attr("stroke-opacity", fmt_num(f64::from(theme.grid_opacity)));
        axis.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate({},0)", fmt_num(tick.offset)))
                .child(tick_line)
                .child(grid_line)
                .child(
                    Element::new("text")
                        .attr("fill", &theme.axis_text_color)
                        .attr("y", fmt_num(AXIS_TICK_SIZE + AXIS_TICK_PADDING))
                        .attr("dy", "0.71em")
                        .text(&tick.label),
                ),
        );
    }
    axis
}

fn y_axis(layout: &ChartLayout, theme: &Theme, config: &ChartConfig) -> Element {
    let mut axis = axis_group("axis y-axis", theme, config, "end");
    for tick in &layout.y_axis.ticks {
        let tick_line = Element::new("line")
            .attr("stroke", &theme.axis_text_color)
            .attr("x2", fmt_num(-AXIS_TICK_SIZE));
        let grid_line = tick_line
            .clone()
            .attr("x2", fmt_num(layout.plot_width))
            .attr("stroke-opacity", fmt_num(f64::from(theme.grid_opacity)));
        axis.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate(0,{})", fmt_num(tick.offset)))
                .child(tick_line)
                .child(grid_line)
                .child(
                    Element::new("text")
                        .attr("fill", &theme.axis_text_color)
                        .attr("x", fmt_num(-(AXIS_TICK_SIZE + AXIS_TICK_PADDING)))
                        .attr("dy", "0.32em")
                        .text(&tick.label),
                ),
        );
    }
    axis
}

// The axis domain line is left out on purpose; grid lines carry the frame.
fn axis_group(class: &str, theme: &Theme, config: &ChartConfig, anchor: &str) -> Element {
    Element::new("g")
        .attr("class", class)
        .attr("fill", "none")
        .attr("font-size", fmt_num(config.axis_font_size))
        .attr("font-family", &theme.font_family)
        .attr("text-anchor", anchor)
}

fn axis_title(title: &AxisTitle, theme: &Theme, config: &ChartConfig) -> Element {
    Element::new("text")
        .attr("x", fmt_num(title.x))
        .attr("y", fmt_num(title.y))
        .attr("text-anchor", title.anchor.as_str())
        .attr("font-size", fmt_num(config.axis_title_font_size))
        .attr("font-weight", "700")
        .attr("font-family", &theme.font_family)
        .attr("fill", &theme.label_color)
        .text(&title.text)
}

fn reveal_path(layout: &ChartLayout, theme: &Theme, config: &ChartConfig, animate: bool) -> Element {
    let mut path = Element::new("path")
        .attr("fill", "none")
        .attr("stroke", &theme.line_color)
        .attr("stroke-width", fmt_num(config.path_stroke_width))
        .attr("d", layout.curve.to_path_data());
    if !animate {
        return path;
    }
    let plan = &layout.reveal;
    let from = dasharray(plan.initial_dasharray());
    let to = dasharray(plan.final_dasharray());
    path.set_attr("stroke-dasharray", &from);
    path.push(
        Element::new("animate")
            .attr("attributeName", "stroke-dasharray")
            .attr("from", from)
            .attr("to", to)
            .attr("begin", "0ms")
            .attr("dur", format!("{}ms", fmt_num(plan.duration_ms)))
            .attr("calcMode", "linear")
            .attr("fill", "freeze"),
    );
    path
}

fn labels(points: &[PointLayout], plan: &RevealPlan, theme: &Theme, config: &ChartConfig) -> Element {
    let mut group = Element::new("g");
    for (idx, point) in points.iter().enumerate() {
        let mut text = Element::new("text")
            .attr("x", fmt_num(point.x))
            .attr("y", fmt_num(point.y))
            .attr("font-size", fmt_num(config.label_font_size))
            .attr("font-family", &theme.font_family)
            .text(&point.year);
        apply_placement(&mut text, point.placement);
        if config.animate {
            text.set_attr("fill", "none");
        } else {
            text.set_attr("fill", &theme.label_color);
        }
        group.push(text);
        let last = group.children.len() - 1;
        let Some(original) = halo(&mut group.children, last, &theme.halo_color, config.halo_stroke_width)
        else {
            continue;
        };
        if !config.animate {
            continue;
        }
        let delay = plan.label_delays_ms.get(idx).copied().unwrap_or(0.0);
        if let Some(Node::Element(text)) = group.children.get_mut(original) {
            fade_in(text, &theme.label_color, delay, config.label_fade_ms);
        }
    }
    group
}

fn fade_in(text: &mut Element, color: &str, delay_ms: f64, fade_ms: f64) {
    let begin = format!("{}ms", fmt_num(delay_ms));
    text.push(
        Element::new("set")
            .attr("attributeName", "fill")
            .attr("to", color)
            .attr("begin", &begin)
            .attr("fill", "freeze"),
    );
    text.push(
        Element::new("animate")
            .attr("attributeName", "fill-opacity")
            .attr("from", "0")
            .attr("to", "1")
            .attr("begin", &begin)
            .attr("dur", format!("{}ms", fmt_num(fade_ms.max(1.0))))
            .attr("fill", "freeze"),
    );
}

fn dasharray((dash, gap): (f64, f64)) -> String {
    format!("{},{}", fmt_num(dash), fmt_num(gap))
}

fn fmt_num(value: f64) -> String {
    crate::layout::fmt_coord(value)
}

/// Wraps the chart in a page whose `.chart` container holds the SVG.
pub fn render_html(svg: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>body{{margin:0;font-family:sans-serif}}.chart{{padding:16px}}</style>\n</head>\n<body>\n<div class=\"chart\">{}</div>\n</body>\n</html>\n",
        escape_xml(title),
        svg
    )
}

pub fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
        }
        None => {
            print!("{}", contents);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "sans-serif".to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = render_cfg.png_scale.max(0.1);
    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| anyhow::anyhow!("Invalid output size"))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    tracing::info!(path = %output.display(), width = size.width(), height = size.height(), "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature to be enabled"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
