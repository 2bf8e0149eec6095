#[cfg(target_os = "linux")]
mod pair;

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> { // Note, this is anyhow::Result
    pair::run()
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("v4l2-pair needs the Linux media controller API");
    std::process::exit(1);
}
