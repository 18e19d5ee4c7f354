
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// An RGB colour with channels nominally in [0,1].
/// Intermediate sums may leave the range; `clamped` brings them back.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const BLACK: Colour = Colour { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Colour = Colour { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b }
    }

    pub fn grey(v: f32) -> Colour {
        Colour { r: v, g: v, b: v }
    }

    pub fn clamped(&self) -> Colour {
        Colour {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Add for Colour {
    type Output = Colour;
    fn add(self, other: Colour) -> Colour {
        Colour { r: self.r + other.r, g: self.g + other.g, b: self.b + other.b }
    }
}

impl AddAssign for Colour {
    fn add_assign(&mut self, other: Colour) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

/// Component-wise product, as used for material/light modulation
impl Mul for Colour {
    type Output = Colour;
    fn mul(self, other: Colour) -> Colour {
        Colour { r: self.r * other.r, g: self.g * other.g, b: self.b * other.b }
    }
}

impl Mul<f32> for Colour {
    type Output = Colour;
    fn mul(self, scale: f32) -> Colour {
        Colour { r: self.r * scale, g: self.g * scale, b: self.b * scale }
    }
}

impl Mul<Colour> for f32 {
    type Output = Colour;
    fn mul(self, colour: Colour) -> Colour {
        colour * self
    }
}
