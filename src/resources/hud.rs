//! HUD meter state.
//!
//! The [`Hud`] resource holds one [`HudMeter`] per [`MeterKind`]. A meter
//! displays a fraction in `[0, 1]`; what a renderer would draw is the
//! quantized [`fill_percent`](HudMeter::fill_percent), in 28 segments.
//!
//! Animated increases are driven by [`crate::systems::hud`].

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::resources::timerbus::BindingId;

/// Number of segments a meter is drawn with.
pub const METER_SEGMENTS: f32 = 28.0;
/// Default fill speed in fraction per second.
pub const DEFAULT_FILL_SPEED: f32 = 1.0;

/// Round a fraction down to a whole segment.
///
/// A strictly positive fraction never renders empty: anything below one
/// segment shows as exactly one segment.
pub fn quantize(fraction: f32) -> f32 {
    let step = 1.0 / METER_SEGMENTS;
    let quantized = (fraction * METER_SEGMENTS).floor() / METER_SEGMENTS;
    if quantized <= 0.0 && fraction > 0.0 {
        step
    } else {
        quantized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterKind {
    Health,
    Ammo,
    Boss,
}

impl MeterKind {
    pub const ALL: [MeterKind; 3] = [MeterKind::Health, MeterKind::Ammo, MeterKind::Boss];
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudMeter {
    displayed: f32,
    pub(crate) target: f32,
    /// Fill speed of animated increases, fraction per second.
    pub fill_speed: f32,
    pub visible: bool,
    fill_percent: f32,
    pub(crate) animation: Option<BindingId>,
}

impl HudMeter {
    pub fn new(fill_speed: f32) -> Self {
        Self {
            displayed: 0.0,
            target: 0.0,
            fill_speed,
            visible: false,
            fill_percent: 0.0,
            animation: None,
        }
    }

    /// Raw fraction currently displayed.
    pub fn displayed(&self) -> f32 {
        self.displayed
    }

    /// Fraction the meter is heading to.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Quantized fill height, in percent.
    pub fn fill_percent(&self) -> f32 {
        self.fill_percent
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(crate) fn display(&mut self, fraction: f32) {
        self.displayed = fraction;
        self.fill_percent = quantize(fraction) * 100.0;
    }

    /// Move the displayed value towards the target. Returns true once the
    /// target is reached; the value is then exactly the target.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        let mut value = self.displayed + self.fill_speed * dt;
        let reached = value >= self.target;
        if reached {
            value = self.target;
        }
        self.display(value);
        reached
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Hud {
    meters: FxHashMap<MeterKind, HudMeter>,
    tracked: Option<Entity>,
    current_weapon: Option<String>,
    pub(crate) observers: Vec<Entity>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(DEFAULT_FILL_SPEED)
    }
}

impl Hud {
    /// Hidden HUD with every meter empty.
    pub fn new(fill_speed: f32) -> Self {
        Self {
            meters: MeterKind::ALL
                .into_iter()
                .map(|kind| (kind, HudMeter::new(fill_speed)))
                .collect(),
            tracked: None,
            current_weapon: None,
            observers: Vec::new(),
        }
    }

    pub fn meter(&self, kind: MeterKind) -> &HudMeter {
        &self.meters[&kind]
    }

    pub fn meter_mut(&mut self, kind: MeterKind) -> &mut HudMeter {
        self.meters
            .entry(kind)
            .or_insert_with(|| HudMeter::new(DEFAULT_FILL_SPEED))
    }

    pub fn show(&mut self) {
        self.meters.values_mut().for_each(|m| m.visible = true);
    }

    pub fn hide(&mut self) {
        self.meters.values_mut().for_each(|m| m.visible = false);
    }

    /// True when every meter is visible.
    pub fn is_visible(&self) -> bool {
        self.meters.values().all(|m| m.visible)
    }

    /// True while any meter is filling.
    pub fn is_animating(&self) -> bool {
        self.meters.values().any(HudMeter::is_animating)
    }

    /// Entity whose health and weapon the HUD mirrors.
    pub fn tracked(&self) -> Option<Entity> {
        self.tracked
    }

    pub fn track(&mut self, entity: Option<Entity>) {
        self.tracked = entity;
    }

    /// Code of the last equipped weapon.
    pub fn current_weapon(&self) -> Option<&str> {
        self.current_weapon.as_deref()
    }

    pub(crate) fn set_current_weapon(&mut self, code: impl Into<String>) {
        self.current_weapon = Some(code.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / METER_SEGMENTS;
    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_quantize_tiny_fraction_shows_one_segment() {
        assert!(approx_eq(quantize(0.001), STEP));
    }

    #[test]
    fn test_quantize_zero_is_empty() {
        assert_eq!(quantize(0.0), 0.0);
    }

    #[test]
    fn test_quantize_half() {
        let q = quantize(0.5);
        assert!(q <= 0.5);
        assert!(0.5 - q < STEP);
        assert!(approx_eq(q, 14.0 * STEP));
    }

    #[test]
    fn test_quantize_rounds_down() {
        assert!(approx_eq(quantize(2.9 * STEP), 2.0 * STEP));
        assert!(approx_eq(quantize(1.0), 1.0));
    }

    #[test]
    fn test_meter_advance_clamps_to_target() {
        let mut meter = HudMeter::new(1.0);
        meter.target = 0.5;
        assert!(!meter.advance(0.25));
        assert!(approx_eq(meter.displayed(), 0.25));
        assert!(meter.advance(0.5));
        assert_eq!(meter.displayed(), 0.5);
    }

    #[test]
    fn test_display_sets_fill_percent() {
        let mut meter = HudMeter::new(1.0);
        meter.display(0.001);
        assert!(approx_eq(meter.fill_percent(), STEP * 100.0));
        assert!(approx_eq(meter.displayed(), 0.001));
    }

    #[test]
    fn test_show_hide_all_meters() {
        let mut hud = Hud::default();
        assert!(!hud.is_visible());
        hud.show();
        assert!(MeterKind::ALL.iter().all(|k| hud.meter(*k).visible));
        hud.hide();
        assert!(!hud.meter(MeterKind::Boss).visible);
    }
}
