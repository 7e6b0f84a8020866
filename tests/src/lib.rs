#[cfg(test)]
mod tests {
    use std::path::Path;

    use pgm_persist_core::*;
    use rand::{thread_rng, Rng};
    use rand_distr::{Distribution, Normal, Uniform};
    use tempfile::tempdir;

    type K = u64;

    const EPSILON: usize = 32;

    fn uniform_keys(num: usize) -> Vec<K> {
        let key_dist = Uniform::new(K::MIN, K::MAX);
        let mut keys: Vec<K> = thread_rng().sample_iter(key_dist).take(num).collect();
        keys.sort();
        keys
    }

    /// Clustered keys with plenty of duplicates, closer to real datasets than uniform noise
    fn clustered_keys(num: usize) -> Vec<K> {
        let mut rng = thread_rng();
        let centers = Uniform::new(0.0, 1e12);
        let spread = Normal::new(0.0, 1e6).unwrap();

        let mut keys = Vec::with_capacity(num);
        while keys.len() < num {
            let center: f64 = centers.sample(&mut rng);
            for _ in 0..1000 {
                let key = (center + spread.sample(&mut rng)).max(0.0) as K;
                keys.push(key / 16 * 16);
            }
        }
        keys.truncate(num);
        keys.sort();
        keys
    }

    /// Writes a key file in the benchmark dataset layout: a count header, then the keys
    fn write_key_file<T: FixedWidthKey>(path: &Path, keys: &[T]) {
        let mut bytes = Vec::with_capacity((keys.len() + 1) * T::WIDTH);
        T::from_count(keys.len()).unwrap().write_ne(&mut bytes);
        for key in keys {
            key.write_ne(&mut bytes);
        }
        std::fs::write(path, bytes).unwrap();
    }

    fn representative_keys<I: SegmentedIndex<K>>(segments: &[I::Segment]) -> Vec<K> {
        segments.iter().map(|s| *s.lower_bound()).collect()
    }

    fn test_round_trip<I: SegmentedIndex<K>>(keys: &[K]) {
        let temp_dir = tempdir().unwrap();
        let key_path = temp_dir.path().join("keys");
        let all_path = temp_dir.path().join("all_levels.bin");
        let base_path = temp_dir.path().join("base_level.bin");

        write_key_file(&key_path, keys);
        let loaded = read_key_file::<K>(&key_path).unwrap();
        assert_eq!(loaded, keys);

        let index = I::build(&loaded);

        // All levels
        let written =
            write_segment_file::<K, _>(&index, &all_path, PersistScope::AllLevels).unwrap();
        let reloaded = read_segment_file::<K>(&all_path).unwrap();
        assert_eq!(written, index.segments_count());
        assert_eq!(reloaded.len(), written);
        assert_eq!(reloaded, representative_keys::<I>(index.segments()));

        let bytes = std::fs::read(&all_path).unwrap();
        assert_eq!(K::read_ne(&bytes[..8]).unwrap().to_count(), Some(reloaded.len()));
        assert_eq!(bytes.len(), (reloaded.len() + 1) * 8);

        // Base level only
        let written =
            write_segment_file::<K, _>(&index, &base_path, PersistScope::BaseLevel).unwrap();
        let reloaded = read_segment_file::<K>(&base_path).unwrap();
        assert_eq!(written, index.base_level().len());
        assert_eq!(reloaded, representative_keys::<I>(index.base_level()));
    }

    #[test]
    fn round_trip_pgm_uniform() {
        test_round_trip::<PGMIndex<K, EPSILON>>(&uniform_keys(200_000));
    }

    #[test]
    fn round_trip_pgm_clustered() {
        let keys = clustered_keys(200_000);
        test_round_trip::<PGMIndex<K, EPSILON>>(&keys);
        test_round_trip::<PGMIndex<K, 4, 2>>(&keys);
    }

    #[test]
    fn round_trip_simple_segmentation() {
        test_round_trip::<PGMIndex<K, EPSILON, 4, SimpleSegmentation>>(&clustered_keys(100_000));
    }

    #[test]
    fn round_trip_single_key() {
        test_round_trip::<PGMIndex<K, EPSILON>>(&[42]);
    }

    /// A builder that makes every key its own segment on a single level
    struct Identity(Vec<K>, Vec<usize>);

    impl SegmentedIndex<K> for Identity {
        type Segment = K;

        fn build(keys: &[K]) -> Self {
            Identity(keys.to_vec(), vec![0, keys.len()])
        }

        fn segments(&self) -> &[K] {
            &self.0
        }

        fn levels_offsets(&self) -> &[usize] {
            &self.1
        }
    }

    #[test]
    fn round_trip_stub_builder() {
        test_round_trip::<Identity>(&[5, 10, 15]);
        test_round_trip::<Identity>(&uniform_keys(10_000));
    }

    #[test]
    fn multi_level_count_is_total() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("segments.bin");

        let keys = clustered_keys(200_000);
        let index: PGMIndex<K, 8> = PGMIndex::new(&keys);
        assert!(index.height() > 1);

        write_segment_file::<K, _>(&index, &path, PersistScope::AllLevels).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let count = K::read_ne(&bytes[..8]).unwrap();

        assert_eq!(count.to_count(), index.levels_offsets().last().copied());
        assert_ne!(count.to_count(), Some(index.base_level().len()));
    }

    #[test]
    fn idempotent_saves() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("first.bin");
        let second = temp_dir.path().join("second.bin");

        let keys = uniform_keys(50_000);
        let index: PGMIndex<K, EPSILON> = PGMIndex::new(&keys);

        assert!(save_segments::<K, _>(&index, &first, PersistScope::AllLevels));
        assert!(save_segments::<K, _>(&index, &second, PersistScope::AllLevels));
        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());

        // Saving over an existing file replaces it
        assert!(save_segments::<K, _>(&index, &first, PersistScope::BaseLevel));
        assert_eq!(load_segments::<K>(&first).len(), index.base_level().len());
    }

    #[test]
    fn rebuilt_index_persists_identically() {
        let temp_dir = tempdir().unwrap();
        let key_path = temp_dir.path().join("keys");
        let first = temp_dir.path().join("first.bin");
        let second = temp_dir.path().join("second.bin");

        write_key_file(&key_path, &clustered_keys(100_000));

        let index: PGMIndex<K, EPSILON> = PGMIndex::new(&load_keys::<K>(&key_path));
        write_segment_file::<K, _>(&index, &first, PersistScope::AllLevels).unwrap();

        let index: PGMIndex<K, EPSILON> = PGMIndex::new(&load_keys::<K>(&key_path));
        write_segment_file::<K, _>(&index, &second, PersistScope::AllLevels).unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[test]
    fn narrow_keys() {
        let temp_dir = tempdir().unwrap();
        let key_path = temp_dir.path().join("keys_u32");
        let seg_path = temp_dir.path().join("segments_u32.bin");

        let mut keys: Vec<u32> = thread_rng()
            .sample_iter(Uniform::new(0, u32::MAX))
            .take(100_000)
            .collect();
        keys.sort();
        write_key_file(&key_path, &keys);

        let loaded: Vec<u32> = load_keys(&key_path);
        assert_eq!(loaded, keys);

        let index: PGMIndex<u32, EPSILON> = PGMIndex::new(&loaded);
        write_segment_file::<u32, _>(&index, &seg_path, PersistScope::AllLevels).unwrap();

        let size = std::fs::metadata(&seg_path).unwrap().len() as usize;
        assert_eq!(size, (index.segments_count() + 1) * 4);
        let reloaded: Vec<u32> = load_segments(&seg_path);
        let expected: Vec<u32> = index.segments().iter().map(|s| *s.lower_bound()).collect();
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn header_is_never_a_key() {
        let temp_dir = tempdir().unwrap();
        let key_path = temp_dir.path().join("keys");

        // The header is written as a count, but any value must be skipped
        for header in [0u64, 3, 1 << 63, u64::MAX] {
            let mut bytes = Vec::new();
            for record in [header, 5, 10, 15] {
                record.write_ne(&mut bytes);
            }
            std::fs::write(&key_path, bytes).unwrap();

            assert_eq!(load_keys::<u64>(&key_path), vec![5, 10, 15]);
        }
    }

    #[test]
    fn degenerate_inputs_build_and_persist() {
        let temp_dir = tempdir().unwrap();
        let key_path = temp_dir.path().join("keys");
        let seg_path = temp_dir.path().join("segments.bin");

        write_key_file::<K>(&key_path, &[]);
        let keys = load_keys::<K>(&key_path);
        assert!(keys.is_empty());

        let index: PGMIndex<K, EPSILON> = PGMIndex::new(&keys);
        assert!(save_segments::<K, _>(&index, &seg_path, PersistScope::AllLevels));
        assert!(load_segments::<K>(&seg_path).is_empty());

        assert!(save_segments::<K, _>(&index, &seg_path, PersistScope::BaseLevel));
        assert!(load_segments::<K>(&seg_path).is_empty());
    }

    #[test]
    fn missing_files_are_empty() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nothing_here");

        assert!(load_keys::<K>(&missing).is_empty());
        assert!(load_segments::<K>(&missing).is_empty());
        assert!(matches!(
            read_key_file::<K>(&missing),
            Err(PersistError::Open { .. })
        ));

        let index: PGMIndex<K, EPSILON> = PGMIndex::new(&uniform_keys(1_000));
        let target = missing.join("segments.bin");
        assert!(!save_segments::<K, _>(&index, &target, PersistScope::AllLevels));
        assert!(!missing.exists());
    }
}
