//! User message templates for filing analysts

pub const SUMMARY: &str = r"Filing: {{ ticker }} {{ filing_type }}

{{ text }}";

pub const RISK: &str = r"Risk Factors section:

{{ section }}";

pub const KPI: &str = r"Financial statements:

{{ section }}";

pub const QA: &str = r"Context:
{% for chunk in context %}{{ chunk }}{% if not loop.last %}

{% endif %}{% endfor %}

Question: {{ question }}

Answer:";
