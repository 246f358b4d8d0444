use bevy::prelude::*;

use crate::assets::MyStates;

/// Copies the target's world position onto the holder every frame.
#[derive(Component)]
pub struct PositionFollower {
    pub target: Entity,
}

pub struct FollowerPlugin;

impl Plugin for FollowerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, follow_position.run_if(in_state(MyStates::Next)));
    }
}

fn follow_position(
    mut followers: Query<(&PositionFollower, &mut Transform)>,
    targets: Query<&GlobalTransform, Without<PositionFollower>>,
) {
    for (follower, mut transform) in followers.iter_mut() {
        let Ok(target) = targets.get(follower.target) else {
            continue;
        };
        transform.translation = target.translation();
    }
}
