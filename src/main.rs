#[tokio::main]
async fn main() {
    donatrust_backend::run().await;
}
