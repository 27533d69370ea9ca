use calcwand::clients::common::get_shared_http_client;

#[test]
fn test_shared_http_client_is_singleton() {
    // Get the client multiple times and verify they all point to the same instance
    let client1 = get_shared_http_client();
    let client2 = get_shared_http_client();

    let ptr1 = client1 as *const _;
    let ptr2 = client2 as *const _;

    assert_eq!(
        ptr1, ptr2,
        "All clients should point to the same singleton instance"
    );
}

#[tokio::test]
async fn test_provider_clients_share_connection_pool() {
    use calcwand::clients::gemini::GeminiClient;
    use calcwand::clients::openai::{Model, OpenAIClient};
    use calcwand::ClientWrapper;

    // Construction does not touch the network, so dummy keys are fine.
    let openai = OpenAIClient::new_with_model_enum("dummy_key_1", Model::GPT41Nano);
    let custom = OpenAIClient::new_with_base_url("dummy_key_2", "local-model", "http://localhost:8080");
    let gemini = GeminiClient::new_with_model_string("dummy_key_3", "gemini-2.0-flash");

    assert_eq!(openai.model_name(), "gpt-4.1-nano");
    assert_eq!(custom.model_name(), "local-model");
    assert_eq!(gemini.model_name(), "gemini-2.0-flash");

    // Nothing has been sent yet.
    assert!(openai.get_last_usage().await.is_none());
    assert!(gemini.get_last_usage().await.is_none());
}

#[test]
fn test_config_builds_selected_provider() {
    use calcwand::config::{Provider, SimplifierConfig};
    use calcwand::ClientWrapper;

    let config = SimplifierConfig {
        provider: Provider::OpenAI,
        model: "gpt-4o-mini".to_string(),
        api_key: "dummy".to_string(),
        base_url: Some("http://localhost:11434".to_string()),
    };
    assert_eq!(config.build_client().unwrap().model_name(), "gpt-4o-mini");

    let config = SimplifierConfig {
        provider: Provider::Gemini,
        ..config
    };
    assert_eq!(config.build_client().unwrap().model_name(), "gpt-4o-mini");
}
