fn main() -> anyhow::Result<()> {
    imageviewer_lib::run()
}
