pub mod orbsim_vis3d;
