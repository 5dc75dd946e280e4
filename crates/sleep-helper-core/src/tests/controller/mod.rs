mod home;
mod recorder;
