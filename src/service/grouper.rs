use crate::models::Record;
use indexmap::IndexMap;

/// 按医疗机构编码分组, 组顺序为首次出现顺序
pub fn group_by_institution(records: &[Record]) -> IndexMap<String, Vec<Record>> {
    group_by(records, |r| r.institution_code.clone())
}

/// 按险种类型分组, 缺失险种归为空字符串
pub fn group_by_insurance_type(records: &[Record]) -> IndexMap<String, Vec<Record>> {
    group_by(records, |r| r.insurance_type.clone().unwrap_or_default())
}

fn group_by<F>(records: &[Record], key: F) -> IndexMap<String, Vec<Record>>
where
    F: Fn(&Record) -> String,
{
    let mut groups: IndexMap<String, Vec<Record>> = IndexMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn record(code: &str, insurance: &str) -> Record {
        Record {
            institution_code: code.to_string(),
            institution_name: format!("{} 医院", code),
            insurance_type: Some(insurance.to_string()),
            deduction: BigDecimal::from(1),
            visits: 1,
            cells: Vec::new(),
        }
    }

    #[test]
    fn groups_follow_first_appearance() {
        let records = vec![
            record("H3", "职工"),
            record("H1", "居民"),
            record("H3", "居民"),
            record("H2", "职工"),
        ];

        let by_code = group_by_institution(&records);
        let keys: Vec<_> = by_code.keys().cloned().collect();
        assert_eq!(keys, vec!["H3", "H1", "H2"]);
        assert_eq!(by_code["H3"].len(), 2);

        let by_type = group_by_insurance_type(&records);
        let keys: Vec<_> = by_type.keys().cloned().collect();
        assert_eq!(keys, vec!["职工", "居民"]);
        assert_eq!(by_type["居民"].len(), 2);
    }
}
