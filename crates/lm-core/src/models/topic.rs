//! Naive-Bayes topic model over bag-of-words documents.
//!
//! Every document's topic is fully unobserved, so each unit is a K-way
//! mixture: topic weight times the multinomial mass of the document's term
//! counts under that topic's term distribution.
//!
//! Both the topic weights and each topic's term rates are declared as
//! positive parameters and normalized inside the model, so the sampler works
//! with unconstrained-friendly scalars instead of simplex blocks; with
//! Gamma(1, 1) priors the normalized weights are uniform over the simplex.

use lm_config::{
    validate::{validate_priors, validate_topic_corpus},
    ModelPriors, ParameterDecl, PriorSpec, TopicCorpus,
};

use crate::model::{config_error, LatentClassModel};
use crate::partition::Partition;

/// A naive-Bayes topic mixture over a fixed corpus.
#[derive(Debug, Clone)]
pub struct TopicModel {
    corpus: TopicCorpus,
    priors: ModelPriors,
}

impl TopicModel {
    pub fn new(corpus: TopicCorpus, priors: ModelPriors) -> lm_common::Result<Self> {
        validate_topic_corpus(&corpus).map_err(config_error)?;
        validate_priors(&priors).map_err(config_error)?;
        let expected = corpus.topics + corpus.topics * corpus.vocabulary;
        if priors.dim() != expected {
            return Err(lm_common::Error::Config(format!(
                "topic model over {} topics and {} terms requires {expected} parameters, got {}",
                corpus.topics,
                corpus.vocabulary,
                priors.dim()
            )));
        }
        Ok(Self { corpus, priors })
    }

    /// Gamma(1, 1) priors over every weight and term rate.
    pub fn default_priors(topics: usize, vocabulary: usize) -> ModelPriors {
        let gamma = PriorSpec::Gamma {
            shape: 1.0,
            rate: 1.0,
        };
        let mut parameters = Vec::with_capacity(topics + topics * vocabulary);
        for k in 0..topics {
            parameters.push(ParameterDecl {
                name: format!("topic_weight_{k}"),
                domain: lm_config::Domain::Positive,
                prior: gamma.clone(),
            });
        }
        for k in 0..topics {
            for v in 0..vocabulary {
                parameters.push(ParameterDecl {
                    name: format!("term_rate_{k}_{v}"),
                    domain: lm_config::Domain::Positive,
                    prior: gamma.clone(),
                });
            }
        }
        ModelPriors::new(parameters)
    }

    pub fn corpus(&self) -> &TopicCorpus {
        &self.corpus
    }

    /// Unnormalized term rates of one topic.
    fn term_block<'p>(&self, topic: usize, params: &'p [f64]) -> &'p [f64] {
        let start = self.corpus.topics + topic * self.corpus.vocabulary;
        &params[start..start + self.corpus.vocabulary]
    }
}

impl LatentClassModel for TopicModel {
    fn num_classes(&self) -> usize {
        self.corpus.topics
    }

    fn num_units(&self) -> usize {
        self.corpus.documents.len()
    }

    fn priors(&self) -> &ModelPriors {
        &self.priors
    }

    fn partition(&self, _unit: usize) -> Partition {
        // The topic is never observed: every document mixes over all topics.
        Partition::Ambiguous((0..self.corpus.topics).collect())
    }

    fn log_class_weight(&self, class: usize, params: &[f64]) -> f64 {
        let weights = &params[..self.corpus.topics];
        let total: f64 = weights.iter().sum();
        weights[class].ln() - total.ln()
    }

    fn log_outcome_density(&self, unit: usize, class: usize, params: &[f64]) -> f64 {
        let rates = self.term_block(class, params);
        let total: f64 = rates.iter().sum();
        let log_total = total.ln();

        let mut out = 0.0;
        for (&count, &rate) in self.corpus.documents[unit].iter().zip(rates.iter()) {
            if count == 0 {
                continue;
            }
            out += count as f64 * (rate.ln() - log_total);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_math::{log_mix, multinomial::multinomial_counts_log_pmf};

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    fn two_topic_model() -> TopicModel {
        let corpus = TopicCorpus {
            description: None,
            vocabulary: 3,
            topics: 2,
            documents: vec![vec![2, 1, 0], vec![0, 0, 4]],
        };
        TopicModel::new(corpus, TopicModel::default_priors(2, 3)).unwrap()
    }

    #[test]
    fn every_document_mixes_over_all_topics() {
        let m = two_topic_model();
        assert_eq!(m.partition(0), Partition::Ambiguous(vec![0, 1]));
        assert_eq!(m.partition(1), Partition::Ambiguous(vec![0, 1]));
    }

    #[test]
    fn weights_normalize_across_topics() {
        let m = two_topic_model();
        // weights 3 and 1 -> probabilities 0.75 / 0.25
        let params = [3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert!(approx_eq(m.log_class_weight(0, &params), 0.75f64.ln(), 1e-12));
        assert!(approx_eq(m.log_class_weight(1, &params), 0.25f64.ln(), 1e-12));
    }

    #[test]
    fn outcome_density_matches_normalized_multinomial() {
        let m = two_topic_model();
        // topic 0 rates (2, 1, 1) normalize to (0.5, 0.25, 0.25)
        let params = [1.0, 1.0, 2.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        let out = m.log_outcome_density(0, 0, &params);
        let expected = multinomial_counts_log_pmf(&[2.0, 1.0, 0.0], &[0.5, 0.25, 0.25]);
        assert!(approx_eq(out, expected, 1e-12));
    }

    #[test]
    fn document_marginal_is_topic_mixture() {
        let m = two_topic_model();
        let params = [1.0, 3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 6.0];
        let terms: Vec<(f64, f64)> = (0..2)
            .map(|k| {
                (
                    m.log_class_weight(k, &params),
                    m.log_outcome_density(1, k, &params),
                )
            })
            .collect();
        let expected = log_mix(&terms);

        let post = crate::posterior::LogPosterior::new(m).unwrap();
        assert!(approx_eq(post.unit_log_marginal(1, &params), expected, 1e-12));
    }

    #[test]
    fn dimension_mismatch_is_config_error() {
        let corpus = TopicCorpus {
            description: None,
            vocabulary: 3,
            topics: 2,
            documents: vec![vec![1, 1, 1]],
        };
        let err = TopicModel::new(corpus, TopicModel::default_priors(2, 2)).unwrap_err();
        assert!(matches!(err, lm_common::Error::Config(_)));
    }
}
