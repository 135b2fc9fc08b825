use std::fmt;

//////////////////////////////////////////////////////////////////////////////
// Entity Constants
//////////////////////////////////////////////////////////////////////////////

/// Edge length of every sprite's square hit box
pub const HITBOX_SIZE: f32 = 20.0;

//////////////////////////////////////////////////////////////////////////////
// Kind
//////////////////////////////////////////////////////////////////////////////

/// The three sprite types. Each one converts its prey on contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    /// All kinds, in the order groups are stored and checked for a winner
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    /// Hunters in the order their collisions are resolved each tick:
    /// rock eats scissors, then scissors eat paper, then paper eats rock.
    pub const HUNT_ORDER: [Kind; 3] = [Kind::Rock, Kind::Scissors, Kind::Paper];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Kind::Rock => 0,
            Kind::Paper => 1,
            Kind::Scissors => 2,
        }
    }

    /// The kind this one converts on contact
    #[inline]
    pub fn prey(self) -> Kind {
        match self {
            Kind::Rock => Kind::Scissors,
            Kind::Paper => Kind::Rock,
            Kind::Scissors => Kind::Paper,
        }
    }

    /// The kind that converts this one on contact
    #[inline]
    pub fn predator(self) -> Kind {
        match self {
            Kind::Rock => Kind::Paper,
            Kind::Paper => Kind::Scissors,
            Kind::Scissors => Kind::Rock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kind::Rock => "ROCK",
            Kind::Paper => "PAPER",
            Kind::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//////////////////////////////////////////////////////////////////////////////
// Entity
//////////////////////////////////////////////////////////////////////////////

pub type EntityId = u32;

/// A single sprite. `x`/`y` is the top-left corner of its hit box.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
}

impl Entity {
    pub fn new(id: EntityId, kind: Kind, x: f32, y: f32) -> Self {
        Entity { id, kind, x, y }
    }

    /// Center of the hit box; this is the point the spatial index stores.
    #[inline]
    pub fn center(&self) -> [f32; 2] {
        [self.x + HITBOX_SIZE * 0.5, self.y + HITBOX_SIZE * 0.5]
    }

    /// Strict axis-aligned overlap of the two hit boxes. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.x < other.x + HITBOX_SIZE
            && self.x + HITBOX_SIZE > other.x
            && self.y < other.y + HITBOX_SIZE
            && self.y + HITBOX_SIZE > other.y
    }
}
