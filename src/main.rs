#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docpack_lib::run().await
}
