mod home;
mod player;
mod recorder;
mod screen;

pub use {
    home::{HomeController, HomeState},
    player::{PlayerController, PlayerState},
    recorder::{RecorderController, RecorderState},
    screen::Screen,
};
