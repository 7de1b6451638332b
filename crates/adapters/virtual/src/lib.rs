//! # radiohub-adapter-virtual
//!
//! Simulated Xiaomi gateways for testing and demonstration.
//!
//! ## Provided pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`VirtualGateway`] | In-memory FM radio answering the gateway verbs and `miIO.info` |
//! | [`VirtualConnector`] | `MiioConnector` resolving hosts to registered gateways |
//!
//! Gateways can be taken offline and reject requests signed with a
//! different token, which exercises the setup retry path.
//!
//! ## Dependency rule
//!
//! Depends on `radiohub-adapter-miio` (device handle ports) only.

mod connector;
mod gateway;

pub use connector::{VirtualConnector, VirtualHandle};
pub use gateway::{Channel, ERROR_INVALID_PARAMS, ERROR_UNKNOWN_METHOD, VirtualGateway};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use radiohub_adapter_miio::{MiioRadioConfig, MiioRadioPlatform, Token};
    use radiohub_app::executor::TokioExecutor;
    use radiohub_app::ports::{RadioDeviceExt, RadioPlatform};
    use radiohub_domain::entity::AttributeValue;

    use super::*;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn platform(connector: Arc<VirtualConnector>) -> MiioRadioPlatform<VirtualConnector> {
        let config = MiioRadioConfig::new("192.168.1.20", Token::new(TOKEN).unwrap())
            .with_name("Gateway FM");
        MiioRadioPlatform::new(config, connector)
    }

    #[tokio::test]
    async fn should_drive_virtual_gateway_through_radio() {
        let connector = Arc::new(VirtualConnector::default());
        let gateway =
            connector.add_gateway(VirtualGateway::new("192.168.1.20", Token::new(TOKEN).unwrap()));
        let radios = platform(Arc::clone(&connector))
            .setup(&TokioExecutor)
            .await
            .unwrap();
        let radio = Arc::clone(&radios[0]);

        assert!(!radio.is_on());
        assert!(radio.async_turn_on(&TokioExecutor, None).await.unwrap());
        assert!(gateway.is_playing());
        assert!(radio.is_on());

        assert!(
            radio
                .async_set_volume(&TokioExecutor, "65".to_string())
                .await
                .unwrap()
        );
        assert_eq!(gateway.volume(), 65);

        assert!(
            radio
                .async_play_url(&TokioExecutor, "527782023".to_string())
                .await
                .unwrap()
        );
        assert_eq!(gateway.current_program(), 527_782_023);

        assert!(radio.async_toggle(&TokioExecutor, None).await.unwrap());
        assert!(!gateway.is_playing());
    }

    #[tokio::test]
    async fn should_report_rejected_volume_as_failure() {
        let connector = Arc::new(VirtualConnector::default());
        connector.add_gateway(VirtualGateway::new("192.168.1.20", Token::new(TOKEN).unwrap()));
        let radios = platform(connector).setup(&TokioExecutor).await.unwrap();

        let result = radios[0]
            .async_set_volume(&TokioExecutor, "loud".to_string())
            .await
            .unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn should_expose_channels_and_free_space() {
        let connector = Arc::new(VirtualConnector::default());
        connector.add_gateway(VirtualGateway::new("192.168.1.20", Token::new(TOKEN).unwrap()));
        let radios = platform(connector).setup(&TokioExecutor).await.unwrap();

        let attributes = radios[0].state_attributes();

        assert_eq!(attributes.get("hidden"), Some(&AttributeValue::from("true")));
        assert!(attributes.contains_key("channels"));
        assert!(attributes.contains_key("space_free"));
    }

    #[tokio::test]
    async fn should_not_be_ready_until_gateway_answers() {
        let connector = Arc::new(VirtualConnector::default());
        let gateway =
            connector.add_gateway(VirtualGateway::new("192.168.1.20", Token::new(TOKEN).unwrap()));
        gateway.set_online(false);
        let platform = platform(connector);

        let err = platform.setup(&TokioExecutor).await.err().unwrap();
        assert!(err.is_not_ready());

        gateway.set_online(true);
        assert_eq!(platform.setup(&TokioExecutor).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_not_be_ready_with_wrong_token() {
        let connector = Arc::new(VirtualConnector::default());
        connector.add_gateway(VirtualGateway::new(
            "192.168.1.20",
            Token::new("ffffffffffffffffffffffffffffffff").unwrap(),
        ));

        let err = platform(connector).setup(&TokioExecutor).await.err().unwrap();

        assert!(err.is_not_ready());
    }
}
