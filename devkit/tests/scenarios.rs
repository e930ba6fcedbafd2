//! End-to-end monitor scenarios driven through the devkit harness

use lossmon_agent::{Alert, Host, HostOutcome, IndicatorSet, LossDetector};
use lossmon_devkit::fixtures;
use lossmon_devkit::{FailingSink, TestHarness};

#[tokio::test]
async fn lowercase_timeout_does_not_alert() {
    let mut harness = TestHarness::new().unwrap();
    harness.respond("8.8.8.8", vec!["Resposta de 8.8.8.8: esgotado".to_string()]);

    let monitor = harness.monitor(&["8.8.8.8"]).unwrap();
    let report = monitor.run_cycle().await;

    assert_eq!(report.outcomes[0].1, HostOutcome::Clear);
    assert!(harness.console.is_empty());
    assert!(!harness.log_exists());
}

#[tokio::test]
async fn lost_summary_alerts_console_and_file() {
    let mut harness = TestHarness::new().unwrap();
    harness.respond("1.1.1.1", fixtures::pt_br_lost_summary());

    let monitor = harness.monitor(&["1.1.1.1"]).unwrap();
    let before = harness.log_len().unwrap();
    let report = monitor.run_cycle().await;

    assert_eq!(report.alerts(), 1);
    harness.assert_alerted_hosts(&["1.1.1.1"]).unwrap();

    let alerts = harness.console.alerts();
    let rendered = alerts[0].render();
    assert_eq!(alerts[0].transcript(), fixtures::pt_br_lost_summary().as_slice());
    assert_eq!(harness.log_len().unwrap(), before + rendered.len() as u64);
    assert_eq!(harness.log_contents().unwrap(), rendered);
}

#[tokio::test]
async fn empty_output_leaves_log_untouched() {
    let mut harness = TestHarness::new().unwrap();
    harness.respond("9.9.9.9", Vec::new());
    std::fs::write(harness.log_path(), "existing\n").unwrap();

    let monitor = harness.monitor(&["9.9.9.9"]).unwrap();
    let report = monitor.run_cycle().await;

    assert_eq!(report.outcomes[0].1, HostOutcome::Clear);
    assert!(harness.console.is_empty());
    assert_eq!(harness.log_contents().unwrap(), "existing\n");
}

#[tokio::test]
async fn launch_failure_does_not_skip_next_host() {
    let mut harness = TestHarness::new().unwrap();
    harness
        .fail_launch("8.8.8.8")
        .respond("8.8.4.4", fixtures::pt_br_timeout("8.8.4.4"));

    let monitor = harness.monitor(&["8.8.8.8", "8.8.4.4", "1.1.1.1"]).unwrap();
    let report = monitor.run_cycle().await;

    assert_eq!(harness.prober.calls(), vec!["8.8.8.8", "8.8.4.4", "1.1.1.1"]);
    assert!(matches!(report.outcomes[0].1, HostOutcome::ProbeFailed(_)));
    assert_eq!(report.probe_errors(), 1);
    harness.assert_alerted_hosts(&["8.8.4.4"]).unwrap();
}

#[tokio::test]
async fn log_is_append_only_across_cycles() {
    let mut harness = TestHarness::new().unwrap();
    std::fs::write(harness.log_path(), "older alerts\n").unwrap();
    harness
        .respond("8.8.8.8", fixtures::pt_br_timeout("8.8.8.8"))
        .respond("1.1.1.1", fixtures::pt_br_success("1.1.1.1"))
        .respond("8.8.8.8", fixtures::pt_br_success("8.8.8.8"))
        .respond("1.1.1.1", fixtures::pt_br_timeout("1.1.1.1"))
        .respond("8.8.8.8", fixtures::pt_br_timeout("8.8.8.8"));

    let monitor = harness.monitor(&["8.8.8.8", "1.1.1.1"]).unwrap();
    for _ in 0..3 {
        monitor.run_cycle().await;
    }

    harness.assert_alerted_hosts(&["8.8.8.8", "1.1.1.1", "8.8.8.8"]).unwrap();

    let expected: String = std::iter::once("older alerts\n".to_string())
        .chain(harness.console.alerts().iter().map(Alert::render))
        .collect();
    assert_eq!(harness.log_contents().unwrap(), expected);
}

#[tokio::test]
async fn failing_sink_does_not_block_file_or_loop() {
    let mut harness = TestHarness::new()
        .unwrap()
        .with_sink(FailingSink::new("/locked/log_alertas.txt"));
    harness
        .respond("4.2.2.2", fixtures::pt_br_timeout("4.2.2.2"))
        .respond("8.26.56.26", fixtures::pt_br_timeout("8.26.56.26"));

    let monitor = harness.monitor(&["4.2.2.2", "8.26.56.26"]).unwrap();
    let report = monitor.run_cycle().await;

    for (_, outcome) in &report.outcomes {
        assert_eq!(outcome, &HostOutcome::Alerted { failed_sinks: vec!["failing".to_string()] });
    }
    harness.assert_alerted_hosts(&["4.2.2.2", "8.26.56.26"]).unwrap();
    let log = harness.log_contents().unwrap();
    assert!(log.contains("HOST: 4.2.2.2"));
    assert!(log.contains("HOST: 8.26.56.26"));
}

#[tokio::test]
async fn run_stops_after_scripted_probes() {
    let mut harness = TestHarness::new().unwrap();
    harness
        .respond("8.8.8.8", fixtures::pt_br_timeout("8.8.8.8"))
        .fail_launch("192.168.5.1");

    let monitor = harness.monitor(&["8.8.8.8", "192.168.5.1"]).unwrap();
    let stats = harness.run_for_probes(&monitor, 4).await.unwrap();

    // Two full cycles: the fourth probe triggers shutdown before the next one
    assert_eq!(stats.probes, 4);
    assert_eq!(stats.cycles, 2);
    assert_eq!(stats.alerts, 1);
    assert_eq!(stats.probe_errors, 1);
    assert_eq!(harness.prober.call_count(), 4);
}

#[tokio::test]
async fn english_indicator_set_detects_windows_timeout() {
    let detector = LossDetector::new(IndicatorSet::builtin("en-windows").unwrap());
    let mut harness = TestHarness::new().unwrap().with_detector(detector);
    harness
        .respond("208.67.222.222", fixtures::en_windows_timeout("208.67.222.222"))
        .respond("208.67.220.220", fixtures::pt_br_timeout("208.67.220.220"));

    let monitor = harness.monitor(&["208.67.222.222", "208.67.220.220"]).unwrap();
    monitor.run_cycle().await;

    harness.assert_alerted_hosts(&["208.67.222.222"]).unwrap();
}

#[tokio::test]
async fn iputils_indicator_set_detects_total_loss() {
    let detector = LossDetector::new(IndicatorSet::builtin("en-iputils").unwrap());
    let mut harness = TestHarness::new().unwrap().with_detector(detector);
    harness
        .respond("1.1.1.1", fixtures::iputils_loss("1.1.1.1"))
        .respond("9.9.9.9", fixtures::iputils_success("9.9.9.9"));

    let monitor = harness.monitor(&["1.1.1.1", "9.9.9.9"]).unwrap();
    let report = monitor.run_cycle().await;

    assert_eq!(report.outcomes[1].1, HostOutcome::Clear);
    harness.assert_alerted_hosts(&["1.1.1.1"]).unwrap();
    let log = harness.log_contents().unwrap();
    assert!(log.contains("1 packets transmitted, 0 received, 100% packet loss"));
    assert!(!log.contains("HOST: 9.9.9.9"));
}

#[tokio::test]
async fn accented_output_is_stored_as_ascii() {
    let mut harness = TestHarness::new().unwrap();
    harness.respond(
        "192.168.5.1",
        fixtures::PingOutputBuilder::new("192.168.5.1").unreachable().timeout().build(),
    );

    let monitor = harness.monitor(&["192.168.5.1"]).unwrap();
    monitor.run_cycle().await;

    let log = harness.log_contents().unwrap();
    assert!(log.is_ascii());
    assert!(log.contains("Host de destino inacessivel."));
}

#[test]
fn rendered_block_is_stable_for_fixed_inputs() {
    let build = || {
        Alert::build(
            Host::new("156.154.70.1").unwrap(),
            fixtures::pt_br_lost_summary(),
            fixtures::fixed_time(),
        )
    };

    let rendered = build().render();
    assert_eq!(rendered, build().render());
    assert!(rendered.starts_with(
        " *** ALERTA [05/03/2024 14:07:09] - HOST: 156.154.70.1 - Perda de pacote detectada! ***\n"
    ));
    assert!(rendered.ends_with(&format!("{}\n\n", "-".repeat(80))));
}
