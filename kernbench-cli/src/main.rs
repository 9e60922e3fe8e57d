fn main() -> anyhow::Result<()> {
    kernbench_cli::run()
}
