//! Plain-language description of a report chart

use crate::engine::ReportVariant;
use crate::statistics::PriceStatistics;

/// Build the explanation shown next to the chart of `variant`.
///
/// The text is Portuguese and prices are shown in R$ with two decimals.
pub fn explain(ticker: &str, stats: &PriceStatistics, variant: ReportVariant) -> String {
    match variant {
        ReportVariant::Candlestick => explain_candlestick(ticker, stats),
        ReportVariant::DeviationBands => explain_deviation_bands(ticker, stats),
    }
}

fn trend_word(stats: &PriceStatistics) -> &'static str {
    if stats.is_above_mean() { "acima" } else { "abaixo" }
}

fn explain_candlestick(ticker: &str, stats: &PriceStatistics) -> String {
    format!(
        "Esta é uma análise técnica para o ativo {ticker}.\n\n\
         O gráfico de candlestick mostra a variação de preço diária, onde cada 'vela' representa um dia. \
         Esse gráfico contém os dados relativos aos últimos 6 meses. \
         Velas verdes indicam dias de alta e velas vermelhas, dias de baixa. \
         As barras na parte inferior mostram o volume negociado em cada dia.\n\n\
         As linhas azul e laranja são as Médias Móveis de 20 e 50 dias, respectivamente. \
         Elas ajudam a visualizar a tendência do ativo. \
         Quando a linha azul (curto prazo) está acima da laranja (longo prazo), geralmente sinaliza uma tendência de alta.\n\n\
         Estatísticas Principais:\n\
         - Último Preço de Fechamento: R$ {last:.2}\n\
         - Preço Médio no Período: R$ {mean:.2} (o preço atual está {trend} da média)\n\
         - Volatilidade (Desvio Padrão): R$ {std:.2}\n\
         - Faixa de Preço no Período: R$ {min:.2} (mín) a R$ {max:.2} (máx)",
        ticker = ticker.to_uppercase(),
        last = stats.last_close,
        mean = stats.mean,
        trend = trend_word(stats),
        std = stats.std_dev,
        min = stats.min,
        max = stats.max,
    )
}

fn explain_deviation_bands(ticker: &str, stats: &PriceStatistics) -> String {
    format!(
        "Esta é uma análise estatística para o ativo {ticker}.\n\n\
         A linha azul mostra o preço de fechamento diário dos últimos 6 meses e a linha laranja \
         é a Média Móvel de 20 dias, que suaviza as oscilações de curto prazo.\n\n\
         As linhas horizontais são calculadas sobre todo o histórico de 2 anos. \
         A linha tracejada roxa marca a mediana dos preços de fechamento: metade dos pregões fechou acima dela \
         e metade abaixo. As linhas pontilhadas marcam a média somada e subtraída de 1, 2 e 3 desvios padrão. \
         Em uma distribuição aproximadamente normal, cerca de 68% dos preços ficam dentro de ±1 desvio, \
         95% dentro de ±2 e 99,7% dentro de ±3. Preços próximos das faixas externas indicam \
         movimentos pouco comuns para o ativo.\n\n\
         Estatísticas Principais:\n\
         - Último Preço de Fechamento: R$ {last:.2}\n\
         - Preço Médio no Período: R$ {mean:.2}\n\
         - Mediana: R$ {median:.2}\n\
         - Desvio Padrão: R$ {std:.2}\n\
         - Faixa ±1 Desvio: R$ {lo1:.2} a R$ {hi1:.2}\n\
         - Faixa ±2 Desvios: R$ {lo2:.2} a R$ {hi2:.2}\n\
         - Faixa ±3 Desvios: R$ {lo3:.2} a R$ {hi3:.2}\n\
         - Mínimo e Máximo no Período: R$ {min:.2} (mín) a R$ {max:.2} (máx)",
        ticker = ticker.to_uppercase(),
        last = stats.last_close,
        mean = stats.mean,
        median = stats.median,
        std = stats.std_dev,
        lo1 = stats.band(-1.0),
        hi1 = stats.band(1.0),
        lo2 = stats.band(-2.0),
        hi2 = stats.band(2.0),
        lo3 = stats.band(-3.0),
        hi3 = stats.band(3.0),
        min = stats.min,
        max = stats.max,
    )
}
