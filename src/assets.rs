use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::AudioSource;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum MyStates {
    #[default]
    AssetLoading,
    Next,
}

#[derive(Resource, AssetCollection)]
pub struct GameAssets {
    #[asset(path = "paving_stones.png")]
    #[asset(image(sampler(filter = linear, wrap = repeat)))]
    pub paving_stones: Handle<Image>,

    #[asset(path = "cannonball.glb#Scene0")]
    pub cannonball: Handle<Scene>,

    #[asset(path = "cannon_shot.ogg")]
    pub cannon_shot: Handle<AudioSource>,
}

pub struct AssetPlugin;

impl Plugin for AssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<MyStates>().add_loading_state(
            LoadingState::new(MyStates::AssetLoading)
                .continue_to_state(MyStates::Next)
                .load_collection::<GameAssets>(),
        );
    }
}
