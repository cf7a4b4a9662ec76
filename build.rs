mod build {
    pub mod config;
}

use build::config::config::Cfgs;

fn main() {
    let mut cfgs = Cfgs::new();

    // fuzzing/CI typically runs on nightly; make sure those runs get the bounds-checked
    // path by default without needing to set LAZYJSON_CHECKED explicitly.
    if cfgs.is_unstable() {
        cfgs.enable(Cfgs::LAZYJSON_CHECKED);
    }

    cfgs.apply();
}
