//! Carbon `creates.log` corpora used across harnesses.

#![allow(dead_code)]

/// Retention parameters carbon appends to every creates line.
pub const PARAMS: &str = "(archive=[(60, 525600), (600, 518400)] xff=None agg=None)";

/// Lines paired with how many new datasources each one adds when fed in
/// order into an empty registry.
pub const CORPUS_CREATES: &[(usize, &str)] = &[
    (1, "launchctl-carbon.stdout:24/08/2014 17:59:53 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/df-Volumes-Recovery_HD/df_complex-free.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (0, "astt"),
    (0, "launchctl-carbon.stdout:24/08/2014 17:59:53 :: [creates] creating database file / (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "13/09/2014 23:10:56 :: [creates] creating database file /opt/graphite/storage/whisper/local/random/diceroll.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "launchctl-carbon.stdout:24/08/2014 17:59:54 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/df-Volumes-Recovery_HD/df_complex-reserved.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "launchctl-carbon.stdout:24/08/2014 20:59:54 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/df-Volumes-Media/df_complex-free.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (0, "launchctl-carbon.stdout:24/08/2014 20:59:54 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/df-Volumes-Media/df_complex-free.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "launchctl-carbon.stdout:24/08/2014 23:10:40 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/curl_xml-default/gauge-tvseries_watched-Babylon_5.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (0, "launchctl-carbon.stdout:24/08/2014 23:10:40 :: [creates] creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/curl_xml-default/.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "launchctl-carbon.stdout:24/08/2014 23:10:40 :: creating database file /opt/graphite/storage/whisper/mac-mini_local/collectd/curl_xml-default/gauge-tvseries_watched-Babylon_6.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
    (1, "30/09/2014 00:04:17 :: creating database file /opt/graphite/storage/whisper/graphite-news/metrics/POST123/delete/999-percentile.wsp (archive=[(60, 525600), (600, 518400)] xff=None agg=None)"),
];

/// Build a creates line for a series stored at `whisper_root/<relative>.wsp`.
pub fn creates_line(whisper_root: &str, relative: &str) -> String {
    format!(
        "24/08/2014 17:59:53 :: [creates] creating database file {whisper_root}/{relative}.wsp {PARAMS}"
    )
}

/// Lines that never produce a record.
pub const CORPUS_NOISE: &[&str] = &[
    "",
    "24/08/2014 17:59:53 :: Sorted 12 cache queues in 0.000213 seconds",
    "24/08/2014 17:59:53 :: [listener] MetricLineReceiver connection with 127.0.0.1:52113 established",
    "24/08/2014 17:59:53 :: [creates] new metric host.cpu matched schema default_1min_for_1day",
    "creating database file /opt/graphite/storage/whisper/host/cpu.wsp (params)",
];
