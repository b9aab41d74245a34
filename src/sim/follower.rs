//! Path consumption: walk the seeker from waypoint to waypoint

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::map_range;

/// Discrete facing derived from the sign of the leg's planar delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Facing for a leg. Later checks override earlier ones, so a diagonal
    /// leg resolves to whichever axis is tested last.
    pub fn from_leg(leg: &Leg) -> Self {
        let mut heading = Heading::North;
        if leg.to.x > leg.from.x {
            heading = Heading::East;
        }
        if leg.to.z < leg.from.z {
            heading = Heading::South;
        }
        if leg.to.x < leg.from.x {
            heading = Heading::West;
        }
        heading
    }

    pub fn degrees(self) -> f32 {
        match self {
            Heading::North => 0.0,
            Heading::East => 90.0,
            Heading::South => 180.0,
            Heading::West => 270.0,
        }
    }

    /// Yaw about the vertical axis
    pub fn radians(self) -> f32 {
        self.degrees().to_radians()
    }
}

/// One waypoint-to-waypoint motion segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from: Vec3,
    pub to: Vec3,
}

/// Where the follower placed the seeker this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub heading: Heading,
}

/// Consumes a waypoint list, interpolating linearly along each leg
#[derive(Debug, Clone)]
pub struct PathFollower {
    path: VecDeque<Vec3>,
    leg: Option<Leg>,
    elapsed: f32,
    leg_duration: f32,
    legs_completed: u64,
}

impl PathFollower {
    pub fn new(leg_duration: f32) -> Self {
        Self {
            path: VecDeque::new(),
            leg: None,
            elapsed: 0.0,
            leg_duration,
            legs_completed: 0,
        }
    }

    /// Replace the waypoint list. The current leg is kept so a seeker in
    /// motion finishes its step before picking up the new route.
    pub fn set_path(&mut self, path: Vec<Vec3>) {
        self.path = path.into();
    }

    /// Remaining waypoints, front first
    pub fn path(&self) -> &VecDeque<Vec3> {
        &self.path
    }

    #[inline]
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn leg(&self) -> Option<&Leg> {
        self.leg.as_ref()
    }

    /// Legs walked with non-zero length
    pub fn legs_completed(&self) -> u64 {
        self.legs_completed
    }

    /// Travel vector of the current leg (zero when idle)
    pub fn travel(&self) -> Vec3 {
        self.leg.map(|leg| leg.to - leg.from).unwrap_or(Vec3::ZERO)
    }

    /// Forget the current leg so the next path starts from its first waypoint
    pub fn reset_leg(&mut self) {
        self.leg = None;
    }

    /// Advance by `dt` seconds. Returns the seeker pose, pinned to `ground`,
    /// or `None` when there is nothing to walk.
    pub fn advance(&mut self, dt: f32, ground: f32) -> Option<Pose> {
        if self.path.is_empty() {
            return None;
        }

        self.elapsed += dt;

        if self.leg.is_none() {
            if self.path.len() > 1 {
                self.leg = Some(Leg {
                    from: self.path[0],
                    to: self.path[1],
                });
            } else {
                // A lone waypoint is where the seeker already stands
                let mut position = self.path.pop_front()?;
                position.y = ground;
                self.elapsed = 0.0;
                return Some(Pose {
                    position,
                    heading: Heading::North,
                });
            }
        }
        let leg = self.leg?;

        let t = map_range(self.elapsed, 0.0, self.leg_duration, 0.0, 1.0).clamp(0.0, 1.0);
        let mut position = leg.from.lerp(leg.to, t);
        position.y = ground;
        let heading = Heading::from_leg(&leg);

        if t >= 1.0 {
            self.next_leg(leg);
            self.elapsed = 0.0;
        }

        Some(Pose { position, heading })
    }

    fn next_leg(&mut self, finished: Leg) {
        self.path.pop_front();
        if finished.from != finished.to {
            self.legs_completed += 1;
        }

        let from = finished.to;
        let to = match self.path.front() {
            None => from,
            // Skip a waypoint that repeats the one just reached
            Some(&front) if front == finished.to && self.path.len() > 1 => self.path[1],
            Some(&front) => front,
        };
        self.leg = Some(Leg { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn waypoints(points: &[(f32, f32)]) -> Vec<Vec3> {
        points.iter().map(|&(x, z)| Vec3::new(x, 1.0, z)).collect()
    }

    fn run_until_idle(follower: &mut PathFollower) -> Option<Pose> {
        let mut last = None;
        for _ in 0..10_000 {
            match follower.advance(DT, 0.0) {
                Some(pose) => last = Some(pose),
                None => break,
            }
        }
        last
    }

    #[test]
    fn test_walks_every_leg_and_rests_at_goal() {
        let path = waypoints(&[(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (2.5, 1.5)]);
        let mut follower = PathFollower::new(0.6);
        follower.set_path(path);

        let last = run_until_idle(&mut follower).unwrap();
        assert!(!follower.has_path());
        assert_eq!(follower.legs_completed(), 3);
        assert_eq!(last.position, Vec3::new(2.5, 0.0, 1.5));
    }

    #[test]
    fn test_interpolates_midway() {
        let mut follower = PathFollower::new(0.6);
        follower.set_path(waypoints(&[(0.5, 0.5), (1.5, 0.5)]));

        let pose = follower.advance(0.3, 0.0).unwrap();
        assert!((pose.position.x - 1.0).abs() < 1e-5);
        assert_eq!(pose.position.y, 0.0);
        assert_eq!(pose.heading, Heading::East);
        assert_eq!(follower.path().len(), 2);
    }

    #[test]
    fn test_leg_completion_advances() {
        let mut follower = PathFollower::new(0.6);
        follower.set_path(waypoints(&[(0.5, 0.5), (0.5, 1.5), (0.5, 2.5)]));

        let pose = follower.advance(0.6, 0.0).unwrap();
        assert_eq!(pose.position, Vec3::new(0.5, 0.0, 1.5));
        let leg = follower.leg().unwrap();
        assert_eq!(leg.from, Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(leg.to, Vec3::new(0.5, 1.0, 2.5));
        assert_eq!(follower.path().len(), 2);
    }

    #[test]
    fn test_new_path_mid_leg_skips_reached_waypoint() {
        let mut follower = PathFollower::new(0.6);
        follower.set_path(waypoints(&[(0.5, 0.5), (1.5, 0.5)]));
        follower.advance(0.3, 0.0);

        // Fresh route starting at the leg's destination
        follower.set_path(waypoints(&[(0.5, 0.5), (1.5, 0.5), (2.5, 0.5)]));
        follower.advance(0.3, 0.0);
        let leg = follower.leg().unwrap();
        assert_eq!(leg.from, Vec3::new(1.5, 1.0, 0.5));
        assert_eq!(leg.to, Vec3::new(2.5, 1.0, 0.5));
    }

    #[test]
    fn test_empty_path_does_nothing() {
        let mut follower = PathFollower::new(0.6);
        assert!(follower.advance(DT, 0.0).is_none());
        assert!(follower.leg().is_none());
        assert_eq!(follower.travel(), Vec3::ZERO);
    }

    #[test]
    fn test_single_waypoint_is_consumed_in_place() {
        let mut follower = PathFollower::new(0.6);
        follower.set_path(waypoints(&[(3.5, 4.5)]));
        let pose = follower.advance(DT, 0.0).unwrap();
        assert_eq!(pose.position, Vec3::new(3.5, 0.0, 4.5));
        assert!(!follower.has_path());
        assert_eq!(follower.legs_completed(), 0);
    }

    #[test]
    fn test_zero_dt_never_completes_leg() {
        let mut follower = PathFollower::new(0.6);
        follower.set_path(waypoints(&[(0.5, 0.5), (1.5, 0.5)]));
        for _ in 0..100 {
            follower.advance(0.0, 0.0);
        }
        assert_eq!(follower.path().len(), 2);
        assert_eq!(follower.legs_completed(), 0);
    }

    #[test]
    fn test_heading_from_leg() {
        let leg = |from: (f32, f32), to: (f32, f32)| Leg {
            from: Vec3::new(from.0, 0.0, from.1),
            to: Vec3::new(to.0, 0.0, to.1),
        };
        assert_eq!(Heading::from_leg(&leg((0.0, 0.0), (1.0, 0.0))), Heading::East);
        assert_eq!(Heading::from_leg(&leg((1.0, 0.0), (0.0, 0.0))), Heading::West);
        assert_eq!(Heading::from_leg(&leg((0.0, 1.0), (0.0, 0.0))), Heading::South);
        assert_eq!(Heading::from_leg(&leg((0.0, 0.0), (0.0, 1.0))), Heading::North);
        assert_eq!(Heading::West.degrees(), 270.0);
        assert!((Heading::East.radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
