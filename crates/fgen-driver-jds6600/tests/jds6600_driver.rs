//! Driver behaviour against scripted and simulated instruments.

mod common;

use common::{FakeInstrument, ScriptedTransport};
use fgen_core::{Channel, FgenError, LineTransport, PerChannel};
use fgen_driver_jds6600::command::{FREQUENCY, WAVEFORM};
use fgen_driver_jds6600::{
    AddressMap, ChannelSettings, Command, Dispatcher, Jds6600, Output, Reply, SystemSetting,
    Waveform,
};
use std::collections::HashMap;

fn scripted(replies: &[&str]) -> Jds6600<ScriptedTransport> {
    Jds6600::new(
        ScriptedTransport::new(replies.iter().copied()),
        AddressMap::Direct,
    )
}

// =============================================================================
// Dispatcher
// =============================================================================

#[tokio::test]
async fn get_returns_scalar_or_tuple() {
    let transport = ScriptedTransport::new([":r00=30.", ":r23=100000,0."]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    assert_eq!(
        dispatcher.get(Command::Model, &[]).await.unwrap(),
        Reply::Scalar(30)
    );
    assert_eq!(
        dispatcher.get(Command::FrequencyCh1, &[]).await.unwrap(),
        Reply::Tuple(vec![100_000, 0])
    );
    assert_eq!(
        dispatcher.transport().sent,
        vec![":r00=0.", ":r23=0."]
    );
}

#[tokio::test]
async fn every_exchange_drains_stale_input_first() {
    let transport = ScriptedTransport::new([":ok", ":r21=1."]).with_stale(12);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    dispatcher.set(Command::WaveformCh1, &[1]).await.unwrap();
    dispatcher.get(Command::WaveformCh1, &[]).await.unwrap();

    let transport = dispatcher.into_transport();
    assert_eq!(transport.drains, 2);
    assert_eq!(transport.bytes_available(), 0);
}

#[tokio::test]
async fn echo_of_other_register_is_protocol_mismatch() {
    let transport = ScriptedTransport::new([":r24=100000,0."]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    let err = dispatcher.get(Command::FrequencyCh1, &[]).await.unwrap_err();
    assert!(matches!(err, FgenError::ProtocolMismatch { .. }), "{err:?}");
}

#[tokio::test]
async fn unacknowledged_set_fails() {
    let transport = ScriptedTransport::new([":r21=1."]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    let err = dispatcher.set(Command::WaveformCh1, &[1]).await.unwrap_err();
    assert!(matches!(err, FgenError::NotAcknowledged { .. }), "{err:?}");
}

#[tokio::test]
async fn set_without_value_fails_before_io() {
    let mut dispatcher = Dispatcher::new(ScriptedTransport::default(), AddressMap::Direct);

    let err = dispatcher.set(Command::WaveformCh1, &[]).await.unwrap_err();
    assert!(matches!(err, FgenError::InvalidArgument(_)));
    let err = dispatcher
        .set_per_channel(WAVEFORM, Channel::Both, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, FgenError::InvalidArgument(_)));

    let transport = dispatcher.into_transport();
    assert!(transport.sent.is_empty());
    assert_eq!(transport.drains, 0);
}

#[tokio::test]
async fn missing_reply_surfaces_timeout() {
    let mut dispatcher = Dispatcher::new(ScriptedTransport::default(), AddressMap::Direct);

    let err = dispatcher.get(Command::Model, &[]).await.unwrap_err();
    assert!(matches!(err, FgenError::TransportTimeout { .. }));
}

#[tokio::test]
async fn read_address_follows_per_call_map() {
    let transport = ScriptedTransport::new([":r52=1.", ":r51=1."]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::SystemReadPlusOne);

    dispatcher.get(Command::SystemSound, &[]).await.unwrap();
    dispatcher
        .get_with(Command::SystemSound, &[], AddressMap::Direct)
        .await
        .unwrap();

    assert_eq!(dispatcher.transport().sent, vec![":r52=0.", ":r51=0."]);
}

// =============================================================================
// Channel fan-out
// =============================================================================

#[tokio::test]
async fn set_per_channel_round_trips() {
    let transport = ScriptedTransport::new([":ok", ":ok", ":ok"]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    dispatcher
        .set_per_channel(WAVEFORM, Channel::Ch2, &[3])
        .await
        .unwrap();
    assert_eq!(dispatcher.transport().sent, vec![":w22=3."]);

    dispatcher
        .set_per_channel(WAVEFORM, Channel::Both, &[1])
        .await
        .unwrap();
    assert_eq!(
        dispatcher.transport().sent,
        vec![":w22=3.", ":w21=1.", ":w22=1."]
    );

    dispatcher
        .set_per_channel(WAVEFORM, Channel::None, &[1])
        .await
        .unwrap();
    assert_eq!(dispatcher.transport().sent.len(), 3);
}

#[tokio::test]
async fn get_per_channel_converts_in_channel_order() {
    let transport = ScriptedTransport::new([":r23=100000,0.", ":r24=12500,3."]);
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    let freqs = dispatcher
        .get_per_channel(FREQUENCY, Channel::Both, &[], |reply| reply.pair())
        .await
        .unwrap();
    assert_eq!(freqs, PerChannel::Both((100_000, 0), (12_500, 3)));

    let none = dispatcher
        .get_per_channel(FREQUENCY, Channel::None, &[], |reply| reply.pair())
        .await
        .unwrap();
    assert_eq!(none, PerChannel::Empty);
    assert_eq!(dispatcher.transport().sent.len(), 2);
}

// =============================================================================
// Facade
// =============================================================================

#[tokio::test]
async fn enabling_one_channel_preserves_the_other() {
    let mut fgen = scripted(&[":r20=1,0.", ":ok"]);

    fgen.set_channel_output(Output::On, Channel::Ch2)
        .await
        .unwrap();

    assert_eq!(fgen.into_transport().sent, vec![":r20=0.", ":w20=1,1."]);
}

#[tokio::test]
async fn enabling_both_channels_skips_the_read() {
    let mut fgen = scripted(&[":ok"]);

    fgen.set_channel_output(Output::Off, Channel::Both)
        .await
        .unwrap();

    assert_eq!(fgen.into_transport().sent, vec![":w20=0,0."]);
}

#[tokio::test]
async fn channel_output_reads_both_states_once() {
    let mut fgen = scripted(&[":r20=0,1.", ":r20=0,1."]);

    assert_eq!(
        fgen.channel_output(Channel::Ch2).await.unwrap(),
        PerChannel::One(Output::On)
    );
    assert_eq!(
        fgen.channel_output(Channel::Both).await.unwrap(),
        PerChannel::Both(Output::Off, Output::On)
    );
    assert_eq!(
        fgen.channel_output(Channel::None).await.unwrap(),
        PerChannel::Empty
    );
    assert_eq!(fgen.into_transport().sent.len(), 2);
}

#[tokio::test]
async fn frequency_is_encoded_in_finest_exact_unit() {
    let mut fgen = scripted(&[":ok", ":ok"]);

    fgen.set_frequency(0.125, Channel::Ch1).await.unwrap();
    fgen.set_frequency(1000.0, Channel::Ch2).await.unwrap();

    assert_eq!(
        fgen.into_transport().sent,
        vec![":w23=12500,3.", ":w24=100000,0."]
    );
}

#[tokio::test]
async fn invalid_frequency_is_rejected_before_io() {
    let mut fgen = scripted(&[]);

    for bad in [f64::NAN, f64::INFINITY, -1.0] {
        let err = fgen.set_frequency(bad, Channel::Both).await.unwrap_err();
        assert!(matches!(err, FgenError::InvalidArgument(_)), "{bad}");
    }
    assert!(fgen.into_transport().sent.is_empty());
}

#[tokio::test]
async fn unknown_waveform_code_is_reported() {
    let mut fgen = scripted(&[":r21=99."]);

    let err = fgen.waveform(Channel::Ch1).await.unwrap_err();
    assert!(matches!(
        err,
        FgenError::UnknownCode {
            what: "Waveform",
            value: 99
        }
    ));
}

#[tokio::test]
async fn configure_switches_off_first() {
    let mut fgen = scripted(&[":r20=1,1.", ":ok", ":ok", ":ok", ":ok", ":ok", ":ok"]);
    let settings = ChannelSettings {
        waveform: Some(Waveform::Square),
        frequency_hz: Some(50.0),
        amplitude_v: Some(2.5),
        offset_v: Some(-1.0),
        duty_cycle_pct: Some(25.0),
        output: Some(Output::Off),
    };

    fgen.configure_channel(&settings, Channel::Ch1).await.unwrap();

    assert_eq!(
        fgen.into_transport().sent,
        vec![
            ":r20=0.",
            ":w20=0,1.",
            ":w21=1.",
            ":w23=5000,0.",
            ":w25=2500.",
            ":w27=900.",
            ":w29=250.",
        ]
    );
}

#[tokio::test]
async fn configure_switches_on_last() {
    let mut fgen = scripted(&[":ok", ":ok", ":ok", ":ok", ":ok"]);
    let settings = ChannelSettings {
        waveform: Some(Waveform::Triangle),
        amplitude_v: Some(1.0),
        output: Some(Output::On),
        ..Default::default()
    };

    fgen.configure_channel(&settings, Channel::Both).await.unwrap();

    assert_eq!(
        fgen.into_transport().sent,
        vec![":w21=3.", ":w22=3.", ":w25=1000.", ":w26=1000.", ":w20=1,1."]
    );
}

#[tokio::test]
async fn system_settings_use_shifted_read_register() {
    let transport = ScriptedTransport::new([":r53=7.", ":ok"]);
    let mut fgen = Jds6600::new(transport, AddressMap::SystemReadPlusOne);

    assert_eq!(
        fgen.system_setting(SystemSetting::Brightness).await.unwrap(),
        7
    );
    fgen.set_system_setting(SystemSetting::Brightness, 5)
        .await
        .unwrap();

    assert_eq!(fgen.into_transport().sent, vec![":r53=0.", ":w52=5."]);
}

// =============================================================================
// Simulated instrument over a duplex serial stream
// =============================================================================

#[tokio::test]
async fn settings_round_trip_through_simulated_instrument() {
    let (device, transport) = FakeInstrument::spawn(HashMap::from([
        (0, vec![60]),
        (20, vec![0, 0]),
    ]));
    let mut fgen = Jds6600::new(transport, AddressMap::Direct);

    assert_eq!(fgen.model().await.unwrap(), 60);

    fgen.set_waveform(Waveform::Sine, Channel::Both).await.unwrap();
    fgen.set_frequency(0.0000001, Channel::Ch1).await.unwrap();
    fgen.set_frequency(100_000.125, Channel::Ch2).await.unwrap();
    fgen.set_amplitude(3.3, Channel::Both).await.unwrap();
    fgen.set_offset(0.5, Channel::Ch1).await.unwrap();
    fgen.set_duty_cycle(12.5, Channel::Ch2).await.unwrap();
    fgen.set_phase(90.0).await.unwrap();
    fgen.set_channel_output(Output::On, Channel::Ch1)
        .await
        .unwrap();

    assert_eq!(device.register(23), Some(vec![10, 4]));
    assert_eq!(device.register(24), Some(vec![10_000_013, 0]));
    assert_eq!(device.register(20), Some(vec![1, 0]));

    assert_eq!(
        fgen.waveform(Channel::Both).await.unwrap(),
        PerChannel::Both(Waveform::Sine, Waveform::Sine)
    );
    assert_eq!(
        fgen.frequency(Channel::Ch2).await.unwrap(),
        PerChannel::One(100_000.13)
    );
    assert_eq!(
        fgen.amplitude(Channel::Both).await.unwrap(),
        PerChannel::Both(3.3, 3.3)
    );
    assert_eq!(fgen.offset(Channel::Ch1).await.unwrap(), PerChannel::One(0.5));
    assert_eq!(
        fgen.duty_cycle(Channel::Ch2).await.unwrap(),
        PerChannel::One(12.5)
    );
    assert_eq!(fgen.phase().await.unwrap(), 90.0);
    assert_eq!(
        fgen.channel_output(Channel::Both).await.unwrap(),
        PerChannel::Both(Output::On, Output::Off)
    );

    let requests = device.requests();
    assert_eq!(requests[0], ":r00=0.");
    assert!(requests.contains(&":w20=1,0.".to_string()));
}

#[tokio::test]
async fn stale_line_is_not_taken_as_the_reply() {
    let (host, device) = tokio::io::duplex(256);
    let transport = fgen_core::SerialTransport::new(
        device,
        std::time::Duration::from_millis(200),
        std::time::Duration::from_millis(20),
    );
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    let responder = tokio::spawn(async move {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
        let mut host = BufReader::new(host);
        // Left over from an earlier, unpaired exchange
        host.get_mut().write_all(b":r23=100000,0.\r\n").await.unwrap();
        let mut request = String::new();
        host.read_line(&mut request).await.unwrap();
        host.get_mut().write_all(b":r00=30.\r\n").await.unwrap();
        request
    });

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let reply = dispatcher.get(Command::Model, &[]).await.unwrap();

    assert_eq!(reply, Reply::Scalar(30));
    assert_eq!(responder.await.unwrap().trim(), ":r00=0.");
}

#[tokio::test]
async fn line_noise_is_a_malformed_response() {
    let (host, device) = tokio::io::duplex(256);
    let transport = fgen_core::SerialTransport::new(
        device,
        std::time::Duration::from_millis(200),
        std::time::Duration::ZERO,
    );
    let mut dispatcher = Dispatcher::new(transport, AddressMap::Direct);

    let responder = tokio::spawn(async move {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
        let mut host = BufReader::new(host);
        let mut request = String::new();
        host.read_line(&mut request).await.unwrap();
        host.get_mut().write_all(b":r00=3\xff0.\r\n").await.unwrap();
        host
    });

    let err = dispatcher.get(Command::Model, &[]).await.unwrap_err();
    match err {
        FgenError::MalformedResponse { request, response } => {
            assert_eq!(request, ":r00=0.");
            assert!(response.starts_with(":r00=3"), "{response:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    drop(responder.await.unwrap());
}
