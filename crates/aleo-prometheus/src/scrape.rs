use std::collections::HashSet;

use prometheus::{Gauge, GaugeVec, Opts, Registry, proto::MetricFamily};

use crate::encode::EncodeError;
use crate::schema::{MetricKind, MetricSchema, MetricSpec};

/// One gauge sample produced by a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub kind: MetricKind,
    /// Label pairs in declaration order.
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Observation {
    pub fn new(kind: MetricKind, labels: Vec<(&'static str, String)>, value: f64) -> Self {
        Self {
            kind,
            labels,
            value,
        }
    }

    /// Value of a label, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered observations of a single collect call.
///
/// The first observation is always `up`. Consumed once, by value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrape {
    observations: Vec<Observation>,
}

impl Scrape {
    pub(crate) fn new(observations: Vec<Observation>) -> Self {
        debug_assert!(matches!(
            observations.first(),
            Some(Observation {
                kind: MetricKind::Up,
                ..
            })
        ));
        Self { observations }
    }

    /// `true` when the target answered.
    pub fn is_up(&self) -> bool {
        self.observations
            .first()
            .is_some_and(|o| o.kind == MetricKind::Up && o.value > 0.0)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Group observations into metric families, keeping emission order between families.
    pub fn into_families(self, schema: &MetricSchema) -> Result<Vec<MetricFamily>, EncodeError> {
        let mut groups: Vec<(MetricKind, Vec<Observation>)> = Vec::new();
        for obs in self.observations {
            match groups.iter_mut().find(|(kind, _)| *kind == obs.kind) {
                Some((_, group)) => group.push(obs),
                None => groups.push((obs.kind, vec![obs])),
            }
        }

        let mut families = Vec::with_capacity(groups.len());
        for (kind, group) in groups {
            let spec = schema
                .get(kind)
                .ok_or_else(|| EncodeError::UnknownMetric(format!("{kind:?}")))?;
            families.extend(family_for(schema, spec, &group)?);
        }
        Ok(families)
    }
}

impl IntoIterator for Scrape {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

/// Build one family through a throwaway registry, which sorts its samples.
fn family_for(
    schema: &MetricSchema,
    spec: &MetricSpec,
    group: &[Observation],
) -> Result<Vec<MetricFamily>, EncodeError> {
    let metric = schema.fq_name(spec);
    let label_names: Vec<&str> = group
        .first()
        .map(|o| o.labels.iter().map(|(k, _)| *k).collect())
        .unwrap_or_default();

    for name in &label_names {
        if !spec.labels.iter().any(|l| l == name) {
            return Err(EncodeError::UnexpectedLabel {
                metric,
                label: name.to_string(),
            });
        }
    }

    let opts = Opts::new(spec.name, spec.help).namespace(schema.namespace());
    let registry = Registry::new();

    if label_names.is_empty() {
        if group.len() > 1 {
            return Err(EncodeError::DuplicateSeries(metric));
        }
        let gauge = Gauge::with_opts(opts)?;
        gauge.set(group[0].value);
        registry.register(Box::new(gauge))?;
        return Ok(registry.gather());
    }

    let gauge_vec = GaugeVec::new(opts, &label_names)?;
    let mut seen = HashSet::with_capacity(group.len());
    for obs in group {
        let names: Vec<&str> = obs.labels.iter().map(|(k, _)| *k).collect();
        if names != label_names {
            return Err(EncodeError::InconsistentLabels(metric));
        }
        let values: Vec<&str> = obs.labels.iter().map(|(_, v)| v.as_str()).collect();
        if !seen.insert(values.clone()) {
            return Err(EncodeError::DuplicateSeries(metric));
        }
        gauge_vec
            .get_metric_with_label_values(values.as_slice())?
            .set(obs.value);
    }
    registry.register(Box::new(gauge_vec))?;
    Ok(registry.gather())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_text;
    use crate::schema::{LABEL_CHANNEL, LABEL_STATUS, LABEL_TYPE};

    fn up(value: f64) -> Observation {
        Observation::new(MetricKind::Up, vec![], value)
    }

    #[test]
    fn down_scrape_renders_single_family() {
        let scrape = Scrape::new(vec![up(0.0)]);
        assert!(!scrape.is_up());

        let families = scrape.into_families(&MetricSchema::aleo()).unwrap();
        assert_eq!(families.len(), 1);

        let text = encode_text(&families).unwrap();
        assert_eq!(
            text,
            "# HELP aleo_up Was the last query of the node successful.\n\
             # TYPE aleo_up gauge\n\
             aleo_up 0\n"
        );
    }

    #[test]
    fn families_follow_emission_order() {
        let scrape = Scrape::new(vec![
            up(1.0),
            Observation::new(
                MetricKind::Type,
                vec![(LABEL_TYPE, "validator".into())],
                1.0,
            ),
            Observation::new(
                MetricKind::ConnectedPeers,
                vec![(LABEL_CHANNEL, "b".into())],
                2.0,
            ),
            Observation::new(
                MetricKind::ConnectedPeers,
                vec![(LABEL_CHANNEL, "a".into())],
                7.0,
            ),
        ]);

        let text = encode_text(&scrape.into_families(&MetricSchema::aleo()).unwrap()).unwrap();
        let up_at = text.find("aleo_up 1").unwrap();
        let type_at = text.find("aleo_type{type=\"validator\"} 1").unwrap();
        let peers_a = text.find("aleo_connected_peers{channel=\"a\"} 7").unwrap();
        let peers_b = text.find("aleo_connected_peers{channel=\"b\"} 2").unwrap();
        assert!(up_at < type_at);
        assert!(type_at < peers_a);
        assert!(peers_a < peers_b);
    }

    #[test]
    fn rejects_undeclared_label() {
        let scrape = Scrape::new(vec![
            up(1.0),
            Observation::new(
                MetricKind::ConnectedPeers,
                vec![(LABEL_STATUS, "synced".into())],
                1.0,
            ),
        ]);
        let err = scrape.into_families(&MetricSchema::aleo()).unwrap_err();
        assert!(matches!(err, EncodeError::UnexpectedLabel { .. }));
    }

    #[test]
    fn rejects_duplicate_series() {
        let scrape = Scrape::new(vec![up(1.0), up(0.0)]);
        let err = scrape.into_families(&MetricSchema::aleo()).unwrap_err();
        assert!(matches!(err, EncodeError::DuplicateSeries(m) if m == "aleo_up"));
    }

    #[test]
    fn rejects_metric_missing_from_schema() {
        let schema = MetricSchema::new(
            "aleo",
            vec![crate::schema::MetricSpec::new(MetricKind::Up, "up", "Up.", &[])],
        )
        .unwrap();
        let scrape = Scrape::new(vec![
            up(1.0),
            Observation::new(MetricKind::Type, vec![(LABEL_TYPE, "x".into())], 1.0),
        ]);
        let err = scrape.into_families(&schema).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownMetric(_)));
    }

    #[test]
    fn iterates_in_order_once() {
        let scrape = Scrape::new(vec![
            up(1.0),
            Observation::new(MetricKind::Type, vec![(LABEL_TYPE, "client".into())], 1.0),
        ]);
        let kinds: Vec<_> = scrape.into_iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![MetricKind::Up, MetricKind::Type]);
    }
}
