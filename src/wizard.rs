//! 対話式選定ウィザード
//!
//! 簡易モードの質問を順に表示し、選択結果をフォーム回答にまとめる。
//! 前の回答によって表示しない質問がある（階高は「高さ指定」のときだけ等）。

use crate::error::Result;
use dialoguer::{Input, Select};
use pump_selector_common::FormAnswers;

/// 蛇口数（加圧）の選択肢。吐出階の回答として送る
const FAUCET_CODES: [&str; 5] = ["1", "2", "4", "6", "8"];

pub enum Answer {
    /// 選択肢から選ぶ（コード, 表示名）
    Choice(&'static [(&'static str, &'static str)]),
    /// 数値の自由入力
    Number,
}

pub struct Question {
    pub field: &'static str,
    pub prompt: &'static str,
    pub answer: Answer,
}

pub static QUESTIONS: [Question; 9] = [
    Question {
        field: "purpose",
        prompt: "用途",
        answer: Answer::Choice(&[
            ("house", "住宅"),
            ("building", "集合住宅・ビル"),
            ("farm", "農業"),
            ("sewage", "排水"),
        ]),
    },
    Question {
        field: "location",
        prompt: "設置場所",
        answer: Answer::Choice(&[
            ("roof", "屋上タンク"),
            ("ground", "地上タンク"),
            ("underground", "地下タンク"),
            ("well", "井戸"),
        ]),
    },
    Question {
        field: "source",
        prompt: "水源",
        answer: Answer::Choice(&[
            ("borewell", "ボアウェル"),
            ("river", "河川・池"),
            ("tank", "貯水タンク"),
            ("hospital", "病院排水"),
            ("hotel", "ホテル排水"),
            ("industry", "工場排水"),
            ("home", "家庭排水"),
            ("mall", "商業施設排水"),
        ]),
    },
    Question {
        field: "waterLevel",
        prompt: "水位（フィート）",
        answer: Answer::Choice(&[
            ("0-5", "0-5"),
            ("5-20", "5-20"),
            ("20-28", "20-28"),
            ("28-50", "28-50"),
            ("50-100", "50-100"),
            ("100-200", "100-200"),
            ("200-350", "200-350"),
            ("350-500", "350-500"),
            ("500-700", "500-700"),
        ]),
    },
    Question {
        field: "delivery",
        prompt: "吐出先",
        answer: Answer::Choice(&[
            ("ground", "1階（地上）"),
            ("floor1", "2階"),
            ("floor2", "3階"),
            ("floor3", "4階"),
            ("floor4", "5階"),
            ("custom", "高さを指定"),
            ("1", "蛇口1個（加圧）"),
            ("2", "蛇口2個（加圧）"),
            ("4", "蛇口4個（加圧）"),
            ("6", "蛇口6個（加圧）"),
            ("8", "蛇口8個（加圧）"),
        ]),
    },
    Question {
        field: "customHeight",
        prompt: "吐出高さ（フィート）",
        answer: Answer::Number,
    },
    Question {
        field: "usage",
        prompt: "使用量",
        answer: Answer::Choice(&[
            ("500L-30min", "500Lを30分"),
            ("1000L-30min", "1000Lを30分"),
            ("1500L-30min", "1500Lを30分"),
            ("2000L-60min", "2000Lを60分"),
            ("3000L-60min", "3000Lを60分"),
            ("1bigha-60min", "1ビガを60分"),
            ("3bigha-60min", "3ビガを60分"),
            ("6bigha-60min", "6ビガを60分"),
        ]),
    },
    Question {
        field: "phase",
        prompt: "電源",
        answer: Answer::Choice(&[("220", "単相 220V"), ("440", "三相 440V")]),
    },
    Question {
        field: "quality",
        prompt: "水質",
        answer: Answer::Choice(&[("clean", "清水"), ("dirty", "汚水")]),
    },
];

impl Question {
    /// それまでの回答からこの質問を表示するか判定
    pub fn applies(&self, answers: &FormAnswers) -> bool {
        match self.field {
            "customHeight" => answers.get("delivery") == Some("custom"),
            "usage" => !answers
                .get("delivery")
                .is_some_and(|d| FAUCET_CODES.contains(&d)),
            _ => true,
        }
    }
}

/// 全質問を対話で回答
pub fn run_wizard() -> Result<FormAnswers> {
    let mut answers = FormAnswers::new();

    let total = QUESTIONS.len();
    for (count, question) in QUESTIONS.iter().enumerate() {
        if !question.applies(&answers) {
            continue;
        }
        let prompt = format!("[{}/{}] {}", count + 1, total, question.prompt);
        let value = ask(question, &prompt)?;
        answers.insert(question.field, &value);
    }

    Ok(answers)
}

fn ask(question: &Question, prompt: &str) -> Result<String> {
    match question.answer {
        Answer::Choice(choices) => {
            let labels: Vec<&str> = choices.iter().map(|(_, label)| *label).collect();
            let index = Select::new()
                .with_prompt(prompt)
                .items(&labels[..])
                .default(0)
                .interact()?;
            Ok(choices[index].0.to_string())
        }
        Answer::Number => {
            let input: String = Input::new()
                .with_prompt(prompt)
                .validate_with(|s: &String| {
                    s.trim()
                        .parse::<u32>()
                        .map(|_| ())
                        .map_err(|_| "数値を入力してください")
                })
                .interact_text()?;
            Ok(input.trim().to_string())
        }
    }
}
