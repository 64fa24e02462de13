use crate::obstacle::Obstacle;

/// Frozen copy of the obstacle field at one tick.
///
/// Planning calls read only from a snapshot, so the simulation is free to keep
/// mutating its own obstacles while a plan is being computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    obstacles: Vec<Obstacle>,
    tick: u64,
}

impl Snapshot {
    pub fn new(obstacles: Vec<Obstacle>, tick: u64) -> Self {
        Snapshot { obstacles, tick }
    }

    pub fn capture<'a, I>(obstacles: I, tick: u64) -> Self
    where
        I: IntoIterator<Item = &'a Obstacle>,
    {
        Snapshot {
            obstacles: obstacles.into_iter().cloned().collect(),
            tick,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.is_vehicle())
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.is_platform())
    }
}
