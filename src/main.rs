fn main() -> anyhow::Result<()> {
    toolseq::run()
}
