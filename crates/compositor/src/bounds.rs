//! Bounds propagation through a layer's filter chain.
//!
//! Filters apply in a fixed order: effects, then motion blur, then the layer
//! styles aggregate. Every stage rounds outward so the next one starts from
//! whole pixels.

use lfx_common::{FilterConfig, Frame, Graphic, Layer, Rect};
use lfx_effects::{LayerStylesFilter, MotionBlurFilter};

use crate::filter_list::FilterList;

/// Advance `bounds` through every filter in `list`.
pub fn transform_filter_bounds(bounds: &mut Rect, list: &FilterList<'_>, config: &FilterConfig) {
    for effect in &list.effects {
        effect.transform_bounds(bounds, list.effect_scale, list.layer_frame);
        bounds.round_out();
    }
    if list.has_motion_blur() {
        MotionBlurFilter::transform_bounds(
            bounds,
            list.layer,
            list.layer_frame,
            config.motion_blur_scale_factor,
        );
        bounds.round_out();
    }
    if !list.layer_styles.is_empty() {
        LayerStylesFilter::transform_bounds(
            bounds,
            &list.layer_styles,
            list.layer_style_scale,
            list.layer_frame,
        );
        bounds.round_out();
    }
}

/// Bounds the filter input starts from: the tight content bounds when every
/// effect stays inside the visible area, the parent-size bounds otherwise.
pub fn content_bounds(list: &FilterList<'_>, content: &dyn Graphic) -> Rect {
    if list.process_visible_area_only {
        content.measure_bounds().rounded_out()
    } else {
        list.layer.parent_bounds()
    }
}

/// Replace `bounds` (the layer's tight content bounds) with the bounds of
/// everything its filters draw, in layer coordinates.
pub fn measure_filter_bounds(
    bounds: &mut Rect,
    layer: &Layer,
    layer_frame: Frame,
    config: &FilterConfig,
) {
    let list = FilterList::new(layer, layer_frame, config);
    if list.process_visible_area_only {
        bounds.round_out();
    } else {
        *bounds = layer.parent_bounds();
    }
    transform_filter_bounds(bounds, &list, config);
    if list.use_parent_size_input {
        *bounds = list.inverted_layer_matrix().map_rect(bounds);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lfx_common::{
        Composition, Effect, FastBlurParams, GlowParams, LayerId, LayerKind, LayerStyle,
        MotionTileParams, OuterGlowParams, Point, Property, StrokeParams, Transform2D,
    };

    use super::*;

    fn glow(radius: f32) -> Effect {
        Effect::new(
            "glow",
            GlowParams {
                radius: Property::Static(radius),
                ..Default::default()
            },
        )
    }

    #[test]
    fn no_filters_leave_bounds_unchanged() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 10, height: 10 });
        let config = FilterConfig::default();
        let list = FilterList::new(&layer, Frame(0), &config);
        let mut bounds = Rect::from_wh(10.0, 10.0);
        transform_filter_bounds(&mut bounds, &list, &config);
        assert_eq!(bounds, Rect::from_wh(10.0, 10.0));
    }

    #[test]
    fn effects_round_out_between_stages() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 10, height: 10 })
            .with_effect(glow(1.5))
            .with_effect(glow(1.5));
        let config = FilterConfig::default();
        let list = FilterList::new(&layer, Frame(0), &config);
        let mut bounds = Rect::from_wh(10.0, 10.0);
        transform_filter_bounds(&mut bounds, &list, &config);
        // -1.5 rounds to -2, then -3.5 rounds to -4.
        assert_eq!(bounds, Rect::new(-4.0, -4.0, 14.0, 14.0));
    }

    #[test]
    fn styles_apply_after_effects() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 10, height: 10 })
            .with_effect(glow(2.0))
            .with_layer_style(LayerStyle::new(StrokeParams {
                size: Property::Static(3.0),
                ..Default::default()
            }))
            .with_layer_style(LayerStyle::new(OuterGlowParams {
                size: Property::Static(1.0),
                ..Default::default()
            }));
        let config = FilterConfig::default();
        let list = FilterList::new(&layer, Frame(0), &config);
        let mut bounds = Rect::from_wh(10.0, 10.0);
        transform_filter_bounds(&mut bounds, &list, &config);
        assert_eq!(bounds, Rect::new(-5.0, -5.0, 15.0, 15.0));
    }

    #[test]
    fn styles_round_out() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 10, height: 10 })
            .with_layer_style(LayerStyle::new(OuterGlowParams {
                size: Property::Static(1.5),
                ..Default::default()
            }));
        let config = FilterConfig::default();
        let list = FilterList::new(&layer, Frame(0), &config);
        let mut bounds = Rect::from_wh(10.0, 10.0);
        transform_filter_bounds(&mut bounds, &list, &config);
        assert_eq!(bounds, Rect::new(-2.0, -2.0, 12.0, 12.0));
    }

    #[test]
    fn motion_blur_rounds_out() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 15, height: 15 })
            .with_motion_blur(true)
            .with_transform(
                Property::animated(vec![
                    (Frame(0), Transform2D::default()),
                    (
                        Frame(10),
                        Transform2D {
                            position: Point::new(100.0, 0.0),
                            ..Default::default()
                        },
                    ),
                ])
                .unwrap(),
            );
        let config = FilterConfig::default();
        let list = FilterList::new(&layer, Frame(5), &config);
        let mut bounds = Rect::from_wh(15.0, 15.0);
        transform_filter_bounds(&mut bounds, &list, &config);
        // 1.2x growth gives (-1.5, -1.5, 16.5, 16.5) before rounding.
        assert_eq!(bounds, Rect::new(-2.0, -2.0, 17.0, 17.0));
    }

    #[test]
    fn measure_rounds_visible_area_bounds() {
        let layer = Layer::new(LayerId(1), LayerKind::Solid { width: 10, height: 10 }).with_effect(
            Effect::new(
                "blur",
                FastBlurParams {
                    blurriness: Property::Static(2.0),
                    ..Default::default()
                },
            ),
        );
        let mut bounds = Rect::new(0.5, 0.5, 9.5, 9.5);
        measure_filter_bounds(&mut bounds, &layer, Frame(0), &FilterConfig::default());
        assert_eq!(bounds, Rect::new(-2.0, -2.0, 12.0, 12.0));
    }

    #[test]
    fn measure_parent_size_maps_back_into_layer_space() {
        let comp = Arc::new(Composition::new(200, 100).unwrap());
        let transform = Transform2D {
            position: Point::new(20.0, 10.0),
            scale: Point::splat(2.0),
            ..Default::default()
        };
        let layer = Layer::new(LayerId(1), LayerKind::Shape)
            .with_composition(comp)
            .with_transform(transform)
            .with_effect(Effect::new("tile", MotionTileParams::default()));
        let mut bounds = Rect::from_wh(5.0, 5.0);
        measure_filter_bounds(&mut bounds, &layer, Frame(0), &FilterConfig::default());
        // Parent bounds (0, 0, 200, 100) in layer coordinates.
        assert_eq!(bounds, Rect::new(-10.0, -5.0, 90.0, 45.0));
    }
}
